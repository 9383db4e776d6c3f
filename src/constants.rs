/// 不含虹膜的 face mesh 关键点数量
pub const FACE_MESH_LANDMARKS: usize = 468;

/// 开启 refine 后（含双眼虹膜）的关键点数量
pub const FACE_MESH_REFINED_LANDMARKS: usize = 478;

/// 鼻尖
pub const NOSE_TIP: usize = 1;

/// 额头（面部上边界）
pub const FOREHEAD: usize = 10;

/// 下巴（面部下边界）
pub const CHIN: usize = 152;

/// 左脸颊（面部左边界）
pub const LEFT_CHEEK: usize = 234;

/// 右脸颊（面部右边界）
pub const RIGHT_CHEEK: usize = 454;

/// 左眼：上眼睑、下眼睑、内眼角、外眼角
pub const LEFT_EYE_TOP: usize = 159;
pub const LEFT_EYE_BOTTOM: usize = 145;
pub const LEFT_EYE_INNER: usize = 133;
pub const LEFT_EYE_OUTER: usize = 33;

/// 右眼：上眼睑、下眼睑、内眼角、外眼角
pub const RIGHT_EYE_TOP: usize = 386;
pub const RIGHT_EYE_BOTTOM: usize = 374;
pub const RIGHT_EYE_INNER: usize = 362;
pub const RIGHT_EYE_OUTER: usize = 263;

/// 虹膜标记点（仅 478 点模式）
pub const LEFT_IRIS: [usize; 5] = [468, 469, 470, 471, 472];
pub const RIGHT_IRIS: [usize; 5] = [473, 474, 475, 476, 477];

/// 平均 EAR 低于该值视为眨眼/闭眼
pub const DEFAULT_EAR_THRESHOLD: f64 = 0.2;

/// 归一化视线偏移阈值
pub const DEFAULT_GAZE_LEFT_THRESHOLD: f64 = -0.08;
pub const DEFAULT_GAZE_RIGHT_THRESHOLD: f64 = 0.08;
pub const DEFAULT_GAZE_TOP_THRESHOLD: f64 = -0.15;
pub const DEFAULT_GAZE_BOTTOM_THRESHOLD: f64 = -0.33;

/// 眼宽低于该值视为关键点重合（退化几何）
pub const MIN_EYE_WIDTH: f64 = 1e-6;

/// 面部宽/高低于该值时不做视线判断
pub const MIN_FACE_EXTENT: f64 = 1e-6;

/// 采帧 + 分类周期（毫秒）
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 100;

/// 状态采样周期（毫秒）
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 100;

/// 众数评估窗口（毫秒），必须是采样周期的整数倍
pub const DEFAULT_WINDOW_INTERVAL_MS: u64 = 4_000;

/// 提示音冷却时间（毫秒）
pub const DEFAULT_ALERT_COOLDOWN_MS: u64 = 1_000;

/// landmark provider 默认参数
pub const DEFAULT_MAX_FACES: u32 = 3;
pub const DEFAULT_MIN_DETECTION_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_MIN_TRACKING_CONFIDENCE: f64 = 0.5;

/// 普通关键点绘制半径（像素）
pub const LANDMARK_RADIUS_PX: i32 = 2;

/// 虹膜标记点绘制半径（像素）
pub const IRIS_RADIUS_PX: i32 = 3;

/// 摄像头不可用时推送给状态显示的终止信息
pub const DEVICE_UNAVAILABLE_MESSAGE: &str = "Error: Unable to access webcam.";
