//! Search and upload specifications
//!
//! Patterns use the JFrog conventions:
//! - `repo/dir/*.zip` - `*` matches within a path segment, or across
//!   segments when the search is recursive
//! - `repo/dir/app-?.zip` - `?` matches a single character
//! - `repo/dir/` - everything below `dir`
//! - regexp mode: everything after the repository name is a regular expression

use indexmap::IndexMap;
use regex::Regex;

use crate::config::{OutParams, Source};
use crate::repository::RepositoryError;

/// What to search for in the remote repository
#[derive(Debug, Clone)]
pub struct SearchSpec {
    pub repo: String,
    /// Pattern relative to the repository root
    pub pattern: String,
    pub recursive: bool,
    pub regexp: bool,
    pub props: IndexMap<String, String>,
    matcher: Regex,
}

impl SearchSpec {
    pub fn from_source(source: &Source) -> Result<Self, RepositoryError> {
        let pattern = source.pattern.trim().trim_start_matches('/');
        let (repo, rest) = pattern.split_once('/').unwrap_or((pattern, ""));
        if repo.is_empty() {
            return Err(RepositoryError::InvalidSpec(format!(
                "pattern '{}' must start with a repository name",
                source.pattern
            )));
        }

        let rest = if source.regexp {
            let expression = if rest.is_empty() { ".*" } else { rest };
            expression.to_string()
        } else if rest.is_empty() || rest.ends_with('/') {
            format!("{}*", rest)
        } else {
            rest.to_string()
        };

        let matcher = compile_pattern(&rest, source.recursive, source.regexp)?;

        Ok(Self {
            repo: repo.to_string(),
            pattern: rest,
            recursive: source.recursive,
            regexp: source.regexp,
            props: parse_props(&source.props)?,
            matcher,
        })
    }

    /// Whether a path relative to the repository root is selected
    pub fn matches(&self, relative_path: &str) -> bool {
        self.matcher.is_match(relative_path)
    }

    /// Directory part of the pattern that contains no wildcard, if any
    pub fn literal_dir(&self) -> Option<&str> {
        if self.regexp {
            return None;
        }
        let literal_end = self.pattern.find(['*', '?']).unwrap_or(self.pattern.len());
        self.pattern[..literal_end]
            .rfind('/')
            .map(|idx| &self.pattern[..idx])
            .filter(|dir| !dir.is_empty())
    }
}

/// What to upload and where
#[derive(Debug, Clone)]
pub struct UploadSpec {
    /// Local file, directory or pattern
    pub source: String,
    /// `repo/path/`, always ending with a slash
    pub target: String,
    pub props: IndexMap<String, String>,
    pub threads: usize,
    pub explode_archive: bool,
    pub regexp: bool,
}

impl UploadSpec {
    /// Build an upload spec rooted at the build's working directory
    pub fn new(
        source_dir: &str,
        source: &Source,
        params: &OutParams,
    ) -> Result<Self, RepositoryError> {
        let local = format!(
            "{}{}",
            add_trailing_slash(source_dir),
            params.source.trim_start_matches('/')
        );

        Ok(Self {
            source: local,
            target: add_trailing_slash(params.target.trim().trim_start_matches('/')),
            props: parse_props(&source.props)?,
            threads: params.threads(),
            explode_archive: params.explode_archive,
            regexp: source.regexp,
        })
    }
}

/// Parse `key1=value1;key2=value2`, keeping declaration order
pub fn parse_props(props: &str) -> Result<IndexMap<String, String>, RepositoryError> {
    props
        .split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(RepositoryError::InvalidSpec(format!(
                "property '{}' is not in the form key=value",
                pair
            ))),
        })
        .collect()
}

/// Compile a wildcard or regular-expression pattern into an anchored regex
pub fn compile_pattern(
    pattern: &str,
    recursive: bool,
    regexp: bool,
) -> Result<Regex, RepositoryError> {
    let expression = if regexp {
        format!("^(?:{})$", pattern)
    } else {
        wildcard_to_regex(pattern, recursive)
    };

    Regex::new(&expression)
        .map_err(|e| RepositoryError::InvalidSpec(format!("invalid pattern '{}': {}", pattern, e)))
}

fn wildcard_to_regex(pattern: &str, recursive: bool) -> String {
    let mut expression = String::with_capacity(pattern.len() + 8);
    expression.push('^');
    for c in pattern.chars() {
        match c {
            '*' if recursive => expression.push_str(".*"),
            '*' => expression.push_str("[^/]*"),
            '?' => expression.push_str("[^/]"),
            c => expression.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    expression.push('$');
    expression
}

pub fn add_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn source(pattern: &str, recursive: bool, regexp: bool) -> Source {
        Source {
            url: "https://art.example.com".to_string(),
            pattern: pattern.to_string(),
            recursive,
            regexp,
            ..Source::default()
        }
    }

    #[rstest]
    #[case("libs/app/*.zip", true, "app/a-1.0.0.zip", true)]
    #[case("libs/app/*.zip", true, "app/sub/a-1.0.0.zip", true)]
    #[case("libs/app/*.zip", false, "app/sub/a-1.0.0.zip", false)]
    #[case("libs/app/*.zip", false, "app/a-1.0.0.zip", true)]
    #[case("libs/app/*.zip", true, "app/a-1.0.0.tgz", false)]
    #[case("libs/app/a-?.zip", false, "app/a-1.zip", true)]
    #[case("libs/app/a-?.zip", false, "app/a-10.zip", false)]
    #[case("libs/app/", true, "app/deep/x.bin", true)]
    #[case("libs", true, "anything/at/all", true)]
    #[case("/libs/app/a+b.zip", false, "app/a+b.zip", true)] // literal characters are escaped
    fn search_spec_matches_wildcard_patterns(
        #[case] pattern: &str,
        #[case] recursive: bool,
        #[case] path: &str,
        #[case] expected: bool,
    ) {
        let spec = SearchSpec::from_source(&source(pattern, recursive, false)).unwrap();
        assert_eq!(spec.repo, "libs");
        assert_eq!(spec.matches(path), expected);
    }

    #[rstest]
    #[case(r"libs/app/a-\d+\.\d+\.\d+\.zip", "app/a-1.2.3.zip", true)]
    #[case(r"libs/app/a-\d+\.\d+\.\d+\.zip", "app/a-1.2.3.zip.sha1", false)]
    #[case("libs", "app/x", true)]
    fn search_spec_matches_regexp_patterns(
        #[case] pattern: &str,
        #[case] path: &str,
        #[case] expected: bool,
    ) {
        let spec = SearchSpec::from_source(&source(pattern, true, true)).unwrap();
        assert_eq!(spec.matches(path), expected);
    }

    #[rstest]
    #[case("")]
    #[case("/")]
    fn search_spec_requires_repository(#[case] pattern: &str) {
        assert!(matches!(
            SearchSpec::from_source(&source(pattern, true, false)),
            Err(RepositoryError::InvalidSpec(_))
        ));
    }

    #[test]
    fn search_spec_rejects_invalid_regexp() {
        assert!(matches!(
            SearchSpec::from_source(&source("libs/app/(unclosed", true, true)),
            Err(RepositoryError::InvalidSpec(_))
        ));
    }

    #[rstest]
    #[case("libs/app/release/*.zip", Some("app/release"))]
    #[case("libs/app/*/x.zip", Some("app"))]
    #[case("libs/*.zip", None)]
    #[case("libs/app/", Some("app"))]
    fn search_spec_literal_dir(#[case] pattern: &str, #[case] expected: Option<&str>) {
        let spec = SearchSpec::from_source(&source(pattern, true, false)).unwrap();
        assert_eq!(spec.literal_dir(), expected);
    }

    #[rstest]
    #[case("", vec![])]
    #[case("a=b", vec![("a", "b")])]
    #[case("b=2; a=1;", vec![("b", "2"), ("a", "1")])]
    #[case("empty=", vec![("empty", "")])]
    fn parse_props_keeps_order(#[case] raw: &str, #[case] expected: Vec<(&str, &str)>) {
        let props = parse_props(raw).unwrap();
        let pairs: Vec<(&str, &str)> = props
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(pairs, expected);
    }

    #[rstest]
    #[case("novalue")]
    #[case("=value")]
    fn parse_props_rejects_malformed_pairs(#[case] raw: &str) {
        assert!(matches!(
            parse_props(raw),
            Err(RepositoryError::InvalidSpec(_))
        ));
    }

    #[test]
    fn upload_spec_joins_source_dir_and_normalizes_target() {
        let source = Source {
            props: "build=42".to_string(),
            ..Source::default()
        };
        let params = OutParams {
            target: "libs/app".to_string(),
            source: "/build/*.zip".to_string(),
            threads: 0,
            explode_archive: true,
        };

        let spec = UploadSpec::new("/tmp/build/abc", &source, &params).unwrap();

        assert_eq!(spec.source, "/tmp/build/abc/build/*.zip");
        assert_eq!(spec.target, "libs/app/");
        assert_eq!(spec.threads, 3);
        assert!(spec.explode_archive);
        assert_eq!(spec.props.get("build").map(String::as_str), Some("42"));
    }
}
