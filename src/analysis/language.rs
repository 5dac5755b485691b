//! Output languages.

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Language {
    #[default]
    #[serde(alias = "english", alias = "en")]
    English,
    #[serde(alias = "hindi", alias = "hi")]
    Hindi,
    #[serde(alias = "marathi", alias = "mr")]
    Marathi,
    #[serde(alias = "kannada", alias = "kn")]
    Kannada,
}

impl Language {
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
            Self::Marathi => "Marathi",
            Self::Kannada => "Kannada",
        }
    }

    /// ISO 639-1 code.
    pub fn iso_code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
            Self::Marathi => "mr",
            Self::Kannada => "kn",
        }
    }

    pub fn is_english(&self) -> bool {
        *self == Self::English
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_aliases() {
        let lang: Language = serde_json::from_str("\"mr\"").unwrap();
        assert_eq!(lang, Language::Marathi);
        let lang: Language = serde_json::from_str("\"Hindi\"").unwrap();
        assert_eq!(lang, Language::Hindi);
        assert_eq!(serde_json::to_string(&Language::English).unwrap(), "\"English\"");
    }
}
