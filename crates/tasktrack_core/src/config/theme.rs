use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Plain,
    Noir,
    Solarized,
}

impl Theme {
    /// Lenient name lookup: case and punctuation are ignored, `dark`/`light`
    /// style aliases are accepted, and unknown names yield `None`.
    pub fn from_name(raw: &str) -> Option<Self> {
        match canonical_name(raw).as_str() {
            "" | "default" | "plain" | "vanilla" | "light" => Some(Self::Plain),
            "noir" | "dark" | "dark_mode" | "darkmode" => Some(Self::Noir),
            "solarized" => Some(Self::Solarized),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Plain => "default",
            Self::Noir => "noir",
            Self::Solarized => "solarized",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Plain => Palette {
                accent: "",
                muted: "",
                reset: "",
            },
            Self::Noir => Palette {
                accent: "\x1b[38;5;208m",
                muted: "\x1b[38;5;250m",
                reset: "\x1b[0m",
            },
            Self::Solarized => Palette {
                accent: "\x1b[38;5;108m",
                muted: "\x1b[38;5;250m",
                reset: "\x1b[0m",
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Theme {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Theme::from_name(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown theme '{raw}'")))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn accentize(&self, text: &str) -> String {
        self.paint(self.accent, text)
    }

    pub fn mutedize(&self, text: &str) -> String {
        self.paint(self.muted, text)
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if color.is_empty() {
            text.to_string()
        } else {
            format!("{color}{text}{}", self.reset)
        }
    }
}

/// Lowercases ASCII alphanumerics and collapses every other run into `_`.
pub fn canonical_name(raw: &str) -> String {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    cleaned.trim_matches('_').to_string()
}
