//! Username lookup used by the search boxes.
//!
//! A [`UserDirectory`] answers substring queries with candidate usernames.
//! Matching is case-insensitive, capped at [`MAX_RESULTS`], and never
//! returns the user running the editor.
use crate::error::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Upper bound on candidates returned for one query.
pub const MAX_RESULTS: usize = 15;

pub trait UserDirectory: Send + Sync {
    /// Candidates whose name contains `query`. An empty (after trim) query
    /// returns no candidates without consulting the source.
    fn lookup(&self, query: &str) -> Result<Vec<String>>;
}

/// Directory backed by a passwd-format file, re-read on every lookup.
pub struct PasswdDirectory {
    path: PathBuf,
    exclude: Option<String>,
}

impl PasswdDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            exclude: current_username(),
        }
    }

    /// Override which name is hidden from results (defaults to the current user).
    pub fn excluding(mut self, name: Option<String>) -> Self {
        self.exclude = name;
        self
    }
}

impl UserDirectory for PasswdDirectory {
    fn lookup(&self, query: &str) -> Result<Vec<String>> {
        let q = query.trim();
        if q.is_empty() {
            return Ok(Vec::new());
        }
        let names = parse_passwd(&self.path)
            .with_ctx(|| format!("read {}", self.path.display()))?;
        Ok(match_names(
            names.iter().map(String::as_str),
            q,
            self.exclude.as_deref(),
        ))
    }
}

/// Fixed list of names, e.g. supplied on the command line.
pub struct StaticDirectory {
    names: Vec<String>,
    exclude: Option<String>,
}

impl StaticDirectory {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            exclude: None,
        }
    }

    pub fn excluding(mut self, name: Option<String>) -> Self {
        self.exclude = name;
        self
    }
}

impl UserDirectory for StaticDirectory {
    fn lookup(&self, query: &str) -> Result<Vec<String>> {
        let q = query.trim();
        if q.is_empty() {
            return Ok(Vec::new());
        }
        Ok(match_names(
            self.names.iter().map(String::as_str),
            q,
            self.exclude.as_deref(),
        ))
    }
}

/// Case-insensitive substring filter, in source order, deduplicated, capped at [`MAX_RESULTS`].
pub fn match_names<'a, I>(names: I, query: &str, exclude: Option<&str>) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let q = query.to_lowercase();
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if out.len() >= MAX_RESULTS {
            break;
        }
        if Some(name) == exclude || !name.to_lowercase().contains(&q) {
            continue;
        }
        if !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

/// Account names from a passwd-format file, skipping comments and short lines.
fn parse_passwd<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    let mut names = Vec::new();
    for line in contents.lines() {
        if line.is_empty() || line.starts_with('#') { continue; }
        let parts: Vec<&str> = line.split(':').collect();
        if parts.len() < 7 { continue; }
        names.push(parts[0].to_string());
    }
    Ok(names)
}

/// Name of the user running this process, if it resolves.
pub fn current_username() -> Option<String> {
    users::get_current_username().and_then(|n| n.into_string().ok())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::{SystemTime, UNIX_EPOCH};

	fn tmp_path(tag: &str) -> PathBuf {
		let mut p = std::env::temp_dir();
		let n = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
		p.push(format!("acl_rs_{tag}_{}_{}", std::process::id(), n));
		p
	}

	#[test]
	fn parse_passwd_basic() {
		let path = tmp_path("passwd");
		let data = "\
root:x:0:0:root:/root:/bin/bash
# comment
short:x:1
jdoe:x:1000:1000:John Doe,,,:/home/jdoe:/bin/zsh
";
		fs::write(&path, data).unwrap();

		let names = parse_passwd(&path).unwrap();
		fs::remove_file(&path).ok();

		assert_eq!(names, vec!["root".to_string(), "jdoe".to_string()]);
	}

	#[test]
	fn passwd_lookup_filters_and_excludes() {
		let path = tmp_path("lookup");
		fs::write(
			&path,
			"alice:x:1000:1000::/home/alice:/bin/sh\nmalik:x:1001:1001::/home/malik:/bin/sh\nbob:x:1002:1002::/home/bob:/bin/sh\n",
		)
		.unwrap();
		let dir = PasswdDirectory::new(&path).excluding(Some("malik".into()));
		let hits = dir.lookup(" AL ").unwrap();
		fs::remove_file(&path).ok();
		assert_eq!(hits, vec!["alice".to_string()]);
	}

	#[test]
	fn missing_passwd_file_is_an_error() {
		let dir = PasswdDirectory::new(tmp_path("missing")).excluding(None);
		let err = dir.lookup("a").unwrap_err();
		assert!(err.to_string().starts_with("read "));
	}

	#[test]
	fn empty_query_never_reads_source() {
		let dir = PasswdDirectory::new(tmp_path("never")).excluding(None);
		assert!(dir.lookup("   ").unwrap().is_empty());
	}

	#[test]
	fn results_are_capped() {
		let names: Vec<String> = (0..40).map(|i| format!("user{i}")).collect();
		let dir = StaticDirectory::new(names);
		assert_eq!(dir.lookup("user").unwrap().len(), MAX_RESULTS);
	}
}
