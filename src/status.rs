use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 当前注意力状态，任意时刻只有一个，后到的覆盖先到的。
///
/// 变体顺序即窗口众数的并列裁决顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Straight,
    Left,
    Right,
    Top,
    Bottom,
    BlinkOrClosed,
    NoFace,
    MultiFace,
}

impl Status {
    pub const COUNT: usize = 8;

    pub const ALL: [Status; Status::COUNT] = [
        Status::Straight,
        Status::Left,
        Status::Right,
        Status::Top,
        Status::Bottom,
        Status::BlinkOrClosed,
        Status::NoFace,
        Status::MultiFace,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Straight => "straight",
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::BlinkOrClosed => "blink_or_closed",
            Self::NoFace => "no_face",
            Self::MultiFace => "multi_face",
        }
    }

    /// 状态显示文本
    pub fn label(self) -> &'static str {
        match self {
            Self::Straight => "Looking Straight!",
            Self::Left => "Looking Left!",
            Self::Right => "Looking Right!",
            Self::Top => "Looking Top!",
            Self::Bottom => "Looking Bottom!",
            Self::BlinkOrClosed => "Blink or Eyes Closed!",
            Self::NoFace => "Status: No face detected!",
            Self::MultiFace => "Multiple faces detected!",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == needle)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// 触发提示音的状态集合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertSet([bool; Status::COUNT]);

impl AlertSet {
    pub fn empty() -> Self {
        Self([false; Status::COUNT])
    }

    pub fn contains(&self, status: Status) -> bool {
        self.0[status.index()]
    }

    pub fn insert(&mut self, status: Status) {
        self.0[status.index()] = true;
    }

    pub fn iter(&self) -> impl Iterator<Item = Status> + '_ {
        Status::ALL.into_iter().filter(|s| self.contains(*s))
    }
}

/// 除 Straight 以外全部告警
impl Default for AlertSet {
    fn default() -> Self {
        Status::ALL
            .into_iter()
            .filter(|s| *s != Status::Straight)
            .collect()
    }
}

impl FromIterator<Status> for AlertSet {
    fn from_iter<I: IntoIterator<Item = Status>>(iter: I) -> Self {
        let mut set = Self::empty();
        for status in iter {
            set.insert(status);
        }
        set
    }
}
