//! Jekyll posts and their front matter.

use std::path::Path;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde_yaml::{Mapping, Value};

use crate::handler::jekyll::{base60, JekyllError};

/// Default string form of Ruby `Time` values.
const RUBY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Front matter keys holding explicit short URLs.
const SHORT_URL_KEYS: &[&str] = &["short_url", "shortlink"];

/// A Jekyll page or post.
///
/// `slug` and the filename date fallback assume the post naming scheme
/// `YYYY-MM-DD-slug.ext`.
#[derive(Debug, Clone, Default)]
pub struct Page {
    name: String,
    front_matter: Mapping,
}

impl Page {
    /// Read and parse the file at `path`.
    pub fn open(path: &Path) -> Result<Self, JekyllError> {
        let content = std::fs::read_to_string(path).map_err(|source| JekyllError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::parse(name, &content)
    }

    /// Parse a page from its file name and contents.
    pub fn parse(name: impl Into<String>, content: &str) -> Result<Self, JekyllError> {
        Ok(Self {
            name: name.into(),
            front_matter: parse_front_matter(content)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw front matter value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.front_matter.get(key)
    }

    /// The slug from a `YYYY-MM-DD-slug.ext` file name, or the whole stem.
    pub fn slug(&self) -> &str {
        let stem = Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(self.name.as_str());
        stem.splitn(4, '-').nth(3).unwrap_or(stem)
    }

    /// Publication time: front matter `date` first, then the file name.
    pub fn time(&self) -> Option<DateTime<FixedOffset>> {
        if let Some(date) = self.get("date").and_then(Value::as_str) {
            if let Ok(t) = DateTime::parse_from_rfc3339(date) {
                return Some(t);
            }
            if let Ok(t) = DateTime::parse_from_str(date, RUBY_DATE_FORMAT) {
                return Some(t);
            }
            if let Some(t) = parse_day(date) {
                return Some(t);
            }
        }

        let parts: Vec<&str> = self.name.splitn(4, '-').collect();
        if parts.len() >= 3 {
            return parse_day(&parts[..3].join("-"));
        }
        None
    }

    /// Short URLs declared for this page.
    ///
    /// These come from `short_url`/`shortlink` (string or list) and, for
    /// posts imported from WordPress, `wordpress_id` as both `/b/<base60>`
    /// and `/p/<id>`.
    pub fn short_urls(&self) -> Result<Vec<String>, JekyllError> {
        let mut urls = Vec::new();

        for &key in SHORT_URL_KEYS {
            match self.get(key) {
                None | Some(Value::Null) => {}
                Some(Value::String(url)) => urls.push(url.clone()),
                Some(Value::Sequence(items)) => {
                    urls.extend(items.iter().filter_map(Value::as_str).map(str::to_string));
                }
                Some(other) => {
                    return Err(JekyllError::InvalidField {
                        field: key,
                        value: format!("{other:?}"),
                    })
                }
            }
        }

        if let Some(value) = self.get("wordpress_id") {
            let id = value.as_u64().ok_or_else(|| JekyllError::InvalidField {
                field: "wordpress_id",
                value: format!("{value:?}"),
            })?;
            urls.push(format!("/b/{}", base60::encode(id)));
            urls.push(format!("/p/{id}"));
        }

        Ok(urls)
    }

    /// Permalink path for this page under `template`.
    ///
    /// An explicit front matter `permalink` wins. Returns `None` when the
    /// template needs a date and the page has none.
    pub fn permalink(&self, template: &str) -> Option<String> {
        if let Some(permalink) = self.get("permalink").and_then(Value::as_str) {
            return Some(permalink.to_string());
        }

        let t = self.time()?;
        let url = template
            .replace(":year", &t.year().to_string())
            .replace(":short_year", &format!("{:02}", t.year() % 100))
            .replace(":month", &format!("{:02}", t.month()))
            .replace(":i_month", &t.month().to_string())
            .replace(":day", &format!("{:02}", t.day()))
            .replace(":i_day", &t.day().to_string())
            .replace(":title", self.slug());
        Some(url)
    }
}

fn parse_day(date: &str) -> Option<DateTime<FixedOffset>> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(day.and_hms_opt(0, 0, 0)?.and_utc().fixed_offset())
}

/// Extract the YAML block between leading `---` lines.
///
/// A document that does not start with `---` has empty front matter.
fn parse_front_matter(content: &str) -> Result<Mapping, JekyllError> {
    let Some(body) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return Ok(Mapping::new());
    };

    let mut yaml_len = None;
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            yaml_len = Some(offset);
            break;
        }
        offset += line.len();
    }
    let yaml = &body[..yaml_len.ok_or(JekyllError::UnterminatedFrontMatter)?];
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        other => Err(JekyllError::InvalidField {
            field: "front matter",
            value: format!("{other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn page(name: &str, front_matter: &str) -> Page {
        Page::parse(name, &format!("---\n{front_matter}\n---\nbody\n")).unwrap()
    }

    #[test]
    fn test_parse_front_matter() {
        let p = Page::parse("", "---\ntitle: t\ndate: '2014-05-28 13:50:27 -0700'\n---\nbody\n").unwrap();
        assert_eq!(p.get("title").and_then(Value::as_str), Some("t"));
        assert_eq!(p.get("date").and_then(Value::as_str), Some("2014-05-28 13:50:27 -0700"));
    }

    #[test]
    fn test_no_front_matter() {
        let p = Page::parse("2014-05-28-test.md", "just text\n").unwrap();
        assert!(p.get("title").is_none());
    }

    #[test]
    fn test_empty_front_matter() {
        let p = Page::parse("a.md", "---\n---\n").unwrap();
        assert!(p.front_matter.is_empty());
    }

    #[test]
    fn test_unterminated_front_matter() {
        let err = Page::parse("a.md", "---\ntitle: t\n").unwrap_err();
        assert!(matches!(err, JekyllError::UnterminatedFrontMatter));
    }

    #[test]
    fn test_time() {
        assert!(Page::default().time().is_none());

        let pdt = FixedOffset::west_opt(7 * 3600).unwrap();
        let want = pdt.with_ymd_and_hms(2014, 5, 28, 13, 50, 27).unwrap();
        assert_eq!(page("", "date: '2014-05-28T13:50:27-07:00'").time(), Some(want));
        assert_eq!(page("", "date: '2014-05-28 13:50:27 -0700'").time(), Some(want));

        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(
            Page::parse("2014-05-28-test.md", "").unwrap().time(),
            Some(utc.with_ymd_and_hms(2014, 5, 28, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_slug() {
        assert_eq!(Page::parse("2014-06-08-test-post.md", "").unwrap().slug(), "test-post");
        assert_eq!(Page::parse("about.md", "").unwrap().slug(), "about");
    }

    #[test]
    fn test_short_urls() {
        let cases: [(&str, &[&str]); 6] = [
            ("short_url: /a", &["/a"]),
            ("shortlink: /a", &["/a"]),
            (r#"shortlink: ["/a", "/b"]"#, &["/a", "/b"]),
            ("shortlink: \n- /a\n- /b", &["/a", "/b"]),
            ("wordpress_id: 100", &["/b/1f", "/p/100"]),
            ("shortlink: /a\nwordpress_id: 100", &["/a", "/b/1f", "/p/100"]),
        ];

        for (front_matter, want) in cases {
            let urls = page("", front_matter).short_urls().unwrap();
            assert_eq!(urls, want, "front matter {front_matter:?}");
        }
    }

    #[test]
    fn test_short_urls_invalid() {
        assert!(page("", "wordpress_id: abc").short_urls().is_err());
        assert!(page("", "short_url: {a: b}").short_urls().is_err());
    }

    #[test]
    fn test_permalink() {
        let p = Page::parse("2014-06-08-test.md", "").unwrap();
        assert_eq!(p.permalink("/:year/:month/:day/:title.html").as_deref(), Some("/2014/06/08/test.html"));
        assert_eq!(p.permalink("/:short_year/:i_month/:i_day/:title/").as_deref(), Some("/14/6/8/test/"));

        let p = Page::parse("2014-06-08-test.md", "---\npermalink: /foo\n---\n").unwrap();
        assert_eq!(p.permalink("/:short_year/:i_month/:i_day/:title").as_deref(), Some("/foo"));

        let p = Page::parse("about.md", "").unwrap();
        assert_eq!(p.permalink("/:year/:title.html"), None);
    }
}
