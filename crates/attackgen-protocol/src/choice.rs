use thiserror::Error;

/// Returned when a string names none of the values of a closed choice set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseChoiceError {
    /// Name of the choice set (e.g. "provider", "industry")
    pub kind: &'static str,
    /// The rejected input, trimmed
    pub value: String,
}

/// Declares a closed choice set.
///
/// Each variant gets a stable snake_case-ish id (used for serde and short CLI
/// input) and the human label shown in the front-end. Parsing accepts either,
/// case-insensitively.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $kind:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => ($id:literal, $label:literal)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $id)]
                $variant,
            )+
        }

        impl $name {
            #[doc = concat!("Every `", stringify!($name), "` in display order")]
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable identifier, also the serialized form
            pub fn id(self) -> &'static str {
                match self {
                    $($name::$variant => $id,)+
                }
            }

            /// Label shown to the operator
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::choice::ParseChoiceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|c| {
                        c.id().eq_ignore_ascii_case(needle) || c.label().eq_ignore_ascii_case(needle)
                    })
                    .ok_or_else(|| $crate::choice::ParseChoiceError {
                        kind: $kind,
                        value: needle.to_string(),
                    })
            }
        }
    };
}
