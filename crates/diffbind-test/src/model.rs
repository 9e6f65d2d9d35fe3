//! Host model types. Their comparison code is generated from
//! `declarations.json`.

use diffbind::core::value::Value;

///
/// Line
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Line {
    pub left: String,
    pub right: String,
}

///
/// Picture
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Picture {
    pub tag: String,
    pub image: String,
    pub line: Line,
    pub image_code: String,
    pub title: String,
    pub desc: Option<String>,
    pub likes: u32,
}

///
/// Avatar
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Avatar {
    pub id: u64,
    pub url: Option<String>,
    pub frame: Option<Line>,
    pub views: usize,
    pub mood: Mood,
}

///
/// Mood
///
/// Host-defined leaf type; converts itself into a `Value`.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Mood {
    #[default]
    Calm,
    Busy,
}

impl From<Mood> for Value {
    fn from(mood: Mood) -> Self {
        match mood {
            Mood::Calm => Self::from("calm"),
            Mood::Busy => Self::from("busy"),
        }
    }
}
