use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines a closed set of lowercase keywords as a plain enum, together with its
/// serde names, lookup table and `Display`.
macro_rules! define_keywords {
    ( $(#[$meta:meta])* $name:ident { $( $(#[$vmeta:meta])* $variant:ident => $keyword:literal ),* $(,)? } ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $keyword)] $variant, )*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),* ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $keyword, )*
                }
            }

            /// Case-insensitive lookup of a keyword.
            pub fn from_keyword(keyword: &str) -> Option<Self> {
                match keyword.trim().to_ascii_lowercase().as_str() {
                    $( $keyword => Some($name::$variant), )*
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_keywords! {
    /// What a step does when executed.
    StepKind {
        Action => "action",
        Decision => "decision",
        Subprocess => "subprocess",
        Wait => "wait",
    }
}

define_keywords! {
    /// How a procedure gets started.
    TriggerKind {
        Manual => "manual",
        Schedule => "schedule",
        Webhook => "webhook",
        Event => "event",
    }
}

define_keywords! {
    /// Comparison applied by a decision condition.
    ConditionOperator {
        Equals => "equals",
        Contains => "contains",
        Greater => "greater",
        Less => "less",
    }
}

/// A type tag as it was declared by the author. Documents come from loosely typed
/// sources, so an unrecognized keyword is kept verbatim for the validator to report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Declared<T> {
    Known(T),
    Unknown(String),
}

impl<T: Copy> Declared<T> {
    pub fn known(&self) -> Option<T> {
        match self {
            Declared::Known(kind) => Some(*kind),
            Declared::Unknown(_) => None,
        }
    }
}

impl<T> From<T> for Declared<T> {
    fn from(kind: T) -> Self {
        Declared::Known(kind)
    }
}

impl<T: fmt::Display> fmt::Display for Declared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declared::Known(kind) => write!(f, "{}", kind),
            Declared::Unknown(raw) => f.write_str(raw),
        }
    }
}

impl Declared<StepKind> {
    pub fn parse(raw: &str) -> Self {
        StepKind::from_keyword(raw)
            .map(Declared::Known)
            .unwrap_or_else(|| Declared::Unknown(raw.trim().to_string()))
    }
}

impl Declared<TriggerKind> {
    pub fn parse(raw: &str) -> Self {
        TriggerKind::from_keyword(raw)
            .map(Declared::Known)
            .unwrap_or_else(|| Declared::Unknown(raw.trim().to_string()))
    }
}
