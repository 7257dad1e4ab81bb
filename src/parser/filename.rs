use chrono::NaiveDate;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::domain::ARCHIVE_EXTENSION;
use crate::parser::date::DateExtractor;

static SPECIFICATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--(.+?)__").expect("specification pattern is valid"));

/// Metadata recovered from a filename. Every part is optional: a missing
/// part means "not found", never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFilename {
    pub date: Option<NaiveDate>,
    pub specification: Option<String>,
    pub tag_names: Option<Vec<String>>,
}

/// Splits filenames that follow (or loosely resemble) the naming scheme
/// `YYYY-MM-DD--specification__tag1_tag2.pdf` into their parts.
///
/// The parser only recognizes patterns; interning tags is left to the caller.
#[derive(Debug)]
pub struct NameParser {
    dates: DateExtractor,
    tags: Regex,
}

impl NameParser {
    /// Builds a parser whose tag pattern accepts any of `document_extensions`
    /// (case-insensitive). An empty list falls back to `pdf`.
    pub fn new<S: AsRef<str>>(dates: DateExtractor, document_extensions: &[S]) -> Self {
        let mut extensions: Vec<String> = document_extensions
            .iter()
            .map(|ext| regex::escape(ext.as_ref().trim_start_matches('.')))
            .filter(|ext| !ext.is_empty())
            .collect();
        if extensions.is_empty() {
            extensions.push(ARCHIVE_EXTENSION.to_string());
        }

        let source = format!(r"__(\w+)\.(?i:{})$", extensions.join("|"));
        let tags = Regex::new(&source).expect("tag pattern is built from escaped extensions");

        Self { dates, tags }
    }

    pub fn dates(&self) -> &DateExtractor {
        &self.dates
    }

    /// Parses the last component of `path`.
    pub fn parse(&self, path: impl AsRef<Path>) -> ParsedFilename {
        let filename = path
            .as_ref()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let extracted = self.dates.extract(&filename);
        let raw_date_len = extracted
            .as_ref()
            .map_or(0, |found| found.raw.chars().count());

        let parsed = ParsedFilename {
            date: extracted.map(|found| found.date),
            specification: self.specification(&filename, raw_date_len),
            tag_names: self.tag_names(&filename),
        };
        tracing::debug!(filename = %filename, ?parsed, "parsed filename");
        parsed
    }

    fn specification(&self, filename: &str, raw_date_len: usize) -> Option<String> {
        if let Some(captures) = SPECIFICATION.captures(filename) {
            return captures.get(1).map(|found| found.as_str().to_string());
        }

        let extension_len = Path::new(filename)
            .extension()
            .map_or(0, |ext| ext.to_string_lossy().chars().count() + 1);
        let kept = filename
            .chars()
            .count()
            .saturating_sub(raw_date_len + extension_len);

        let rest: String = filename.chars().skip(raw_date_len).take(kept).collect();
        let before_tags = rest.split("__").next().unwrap_or_default();
        let specification = before_tags
            .replace('_', "-")
            .trim_matches(|c: char| c == '-' || c.is_whitespace())
            .to_string();

        (!specification.is_empty()).then_some(specification)
    }

    fn tag_names(&self, filename: &str) -> Option<Vec<String>> {
        let captures = self.tags.captures(filename)?;
        let names: Vec<String> = captures
            .get(1)?
            .as_str()
            .split('_')
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();

        (!names.is_empty()).then_some(names)
    }
}

impl Default for NameParser {
    fn default() -> Self {
        Self::new(DateExtractor::default(), &[ARCHIVE_EXTENSION])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }

    fn tags(names: &[&str]) -> Option<Vec<String>> {
        Some(names.iter().map(|name| name.to_string()).collect())
    }

    #[test]
    fn canonical_filename() {
        let parsed =
            NameParser::default().parse("/tmp/2010-05-12--example-description__tag1_tag2_tag4.pdf");

        assert_eq!(parsed.date, date("2010-05-12"));
        assert_eq!(parsed.specification.as_deref(), Some("example-description"));
        assert_eq!(parsed.tag_names, tags(&["tag1", "tag2", "tag4"]));
    }

    #[test]
    fn loosely_named_files() {
        let parser = NameParser::default();
        let cases: [(&str, Option<NaiveDate>, Option<&str>, Option<Vec<String>>); 6] = [
            ("2010_05_12__15_17.pdf", date("2010-05-12"), None, tags(&["15", "17"])),
            ("2010_05_12_15_17.pdf", date("2010-05-12"), Some("15-17"), None),
            (
                "2010-05-12 example filename.pdf",
                date("2010-05-12"),
                Some("example filename"),
                None,
            ),
            (
                "20100512 example filename.pdf",
                date("2010-05-12"),
                Some("example filename"),
                None,
            ),
            ("scan 1.pdf", None, Some("scan 1"), None),
            (
                "2010-05-12__tag1_tag2_tag4.pdf",
                date("2010-05-12"),
                None,
                tags(&["tag1", "tag2", "tag4"]),
            ),
        ];

        for (filename, expected_date, expected_spec, expected_tags) in cases {
            let parsed = parser.parse(filename);
            assert_eq!(parsed.date, expected_date, "date of {filename}");
            assert_eq!(
                parsed.specification.as_deref(),
                expected_spec,
                "specification of {filename}"
            );
            assert_eq!(parsed.tag_names, expected_tags, "tags of {filename}");
        }
    }

    #[test]
    fn extension_is_case_insensitive() {
        let parsed = NameParser::default().parse("2018-01-07--shirt__bill_clothes.PDF");
        assert_eq!(parsed.tag_names, tags(&["bill", "clothes"]));
    }

    #[test]
    fn other_extensions_need_configuration() {
        let filename = "2018-01-07--receipt__bill.png";
        assert_eq!(NameParser::default().parse(filename).tag_names, None);

        let parser = NameParser::new(DateExtractor::default(), &["pdf", ".png"]);
        assert_eq!(parser.parse(filename).tag_names, tags(&["bill"]));
    }

    #[test]
    fn empty_tag_segments_are_dropped() {
        let parsed = NameParser::default().parse("2018-01-07--receipt__bill__ikea.pdf");
        assert_eq!(parsed.specification.as_deref(), Some("receipt"));
        assert_eq!(parsed.tag_names, tags(&["bill", "ikea"]));
    }

    #[test]
    fn nothing_to_find() {
        let parsed = NameParser::default().parse("/tmp/--__.pdf");
        assert_eq!(parsed, ParsedFilename::default());
    }
}
