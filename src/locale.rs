/*!
 * Localized section titles of the project document
 */

use clap::ValueEnum;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Languages the section titles are known in
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, EnumString, ValueEnum,
)]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    /// Title of the section holding the directory tree
    pub fn structure_title(self) -> &'static str {
        match self {
            Locale::En => "Project Structure",
            Locale::Ru => "Структура проекта",
        }
    }

    /// Title of the section holding file contents
    pub fn contents_title(self) -> &'static str {
        match self {
            Locale::En => "Files Content",
            Locale::Ru => "Содержимое файлов",
        }
    }

    /// Find the locale whose structure title opens `header`
    ///
    /// `header` is the text after `# `, e.g. `Project Structure: demo`.
    /// Returns the locale and the remainder after the colon.
    pub fn match_structure_header(header: &str) -> Option<(Locale, &str)> {
        Locale::iter().find_map(|locale| {
            header
                .strip_prefix(locale.structure_title())
                .and_then(|rest| rest.strip_prefix(':'))
                .map(|rest| (locale, rest.trim()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_structure_header() {
        assert_eq!(
            Locale::match_structure_header("Project Structure: demo"),
            Some((Locale::En, "demo"))
        );
        assert_eq!(
            Locale::match_structure_header("Структура проекта: демо"),
            Some((Locale::Ru, "демо"))
        );
        assert_eq!(Locale::match_structure_header("Files Content"), None);
        assert_eq!(Locale::match_structure_header("Project Structure"), None);
    }

    #[test]
    fn test_locale_names() {
        assert_eq!("ru".parse::<Locale>().ok(), Some(Locale::Ru));
        assert!("de".parse::<Locale>().is_err());
        assert_eq!(Locale::En.to_string(), "en");
    }
}
