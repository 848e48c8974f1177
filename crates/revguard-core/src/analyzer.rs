//! Static lightweight analysis used as the degraded-mode reviewer.
//!
//! Pattern-based only; there is no semantic understanding of the code. Each
//! rule reports at most once per file, at the first matching line.

use regex::Regex;

use crate::domain::{Issue, ReviewFile, Severity};

pub const CATEGORY_SECURITY: &str = "Security";
pub const CATEGORY_CODE_QUALITY: &str = "Code Quality";
pub const CATEGORY_MAINTAINABILITY: &str = "Maintainability";

/// Files longer than this get a size finding.
pub const DEFAULT_MAX_LINES: usize = 50;

/// Path fragments marking a test file.
const TEST_FILE_MARKERS: [&str; 2] = [".test.", ".spec."];

/// Heuristic reviewer seam; the engine only calls it in degraded mode.
pub trait StaticAnalyzer: Send + Sync {
    /// Analyze one file. Missing path or content yields no issues.
    fn analyze(&self, file: &ReviewFile) -> Vec<Issue>;
}

struct PatternRule {
    regex: Regex,
    severity: Severity,
    category: &'static str,
    description: &'static str,
    skip_test_files: bool,
}

/// Default regex-driven analyzer.
pub struct HeuristicAnalyzer {
    rules: Vec<PatternRule>,
    max_lines: usize,
}

impl Default for HeuristicAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicAnalyzer {
    pub fn new() -> Self {
        let specs: [(&str, Severity, &'static str, &'static str, bool); 4] = [
            (
                r"\beval\s*\(",
                Severity::High,
                CATEGORY_SECURITY,
                "Use of eval() can execute arbitrary code",
                false,
            ),
            (
                r"\.innerHTML\s*\+?=(?:[^=]|$)",
                Severity::High,
                CATEGORY_SECURITY,
                "Direct innerHTML assignment can introduce cross-site scripting",
                false,
            ),
            (
                r#"(?i)\b\w*(password|passwd|pwd|secret|api_?key|token)\b["']?\s*[:=]\s*["'][^"']+["']"#,
                Severity::Critical,
                CATEGORY_SECURITY,
                "Possible hardcoded credential; load secrets from the environment",
                false,
            ),
            (
                r"\bconsole\.log\s*\(",
                Severity::Low,
                CATEGORY_CODE_QUALITY,
                "console.log left in non-test code",
                true,
            ),
        ];

        let rules = specs
            .into_iter()
            .filter_map(|(pattern, severity, category, description, skip_test_files)| {
                Regex::new(pattern).ok().map(|regex| PatternRule {
                    regex,
                    severity,
                    category,
                    description,
                    skip_test_files,
                })
            })
            .collect();

        Self {
            rules,
            max_lines: DEFAULT_MAX_LINES,
        }
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }
}

fn is_test_file(path: &str) -> bool {
    TEST_FILE_MARKERS.iter().any(|m| path.contains(m))
}

impl StaticAnalyzer for HeuristicAnalyzer {
    fn analyze(&self, file: &ReviewFile) -> Vec<Issue> {
        let (Some(path), Some(content)) = (file.path.as_deref(), file.content.as_deref()) else {
            return Vec::new();
        };
        let test_file = is_test_file(path);
        let mut issues = Vec::new();

        for rule in &self.rules {
            if rule.skip_test_files && test_file {
                continue;
            }
            let first_hit = content
                .lines()
                .position(|line| rule.regex.is_match(line));
            if let Some(idx) = first_hit {
                issues.push(
                    Issue::new(rule.severity, rule.category, rule.description)
                        .at(format!("{}:{}", path, idx + 1)),
                );
            }
        }

        let line_count = content.lines().count();
        if line_count > self.max_lines {
            issues.push(
                Issue::new(
                    Severity::Medium,
                    CATEGORY_MAINTAINABILITY,
                    format!(
                        "File has {} lines (limit {}); consider splitting large functions",
                        line_count, self.max_lines
                    ),
                )
                .at(path),
            );
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(path: &str, content: &str) -> Vec<Issue> {
        HeuristicAnalyzer::new().analyze(&ReviewFile::new(path, content))
    }

    #[test]
    fn flags_eval_as_high_security() {
        let issues = analyze("src/app.js", "let a = 1;\neval(\"x\");\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].category, CATEGORY_SECURITY);
        assert_eq!(issues[0].location.as_deref(), Some("src/app.js:2"));
    }

    #[test]
    fn flags_inner_html_assignment_but_not_comparison() {
        assert_eq!(analyze("a.js", "el.innerHTML = input;").len(), 1);
        assert_eq!(analyze("a.js", "el.innerHTML += userInput;").len(), 1);
        assert!(analyze("a.js", "if (el.innerHTML == x) {}").is_empty());
    }

    #[test]
    fn flags_hardcoded_credentials() {
        let issues = analyze("config.py", "password = \"hunter2\"\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);

        let issues = analyze("client.ts", "const API_KEY = 'sk-123';");
        assert_eq!(issues.len(), 1);

        for line in [
            "token = \"ghp_abc123\"",
            "const DB_PASSWORD = \"hunter2\";",
            "const GITHUB_TOKEN = 'ghp_abc';",
            "{\"password\": \"hunter2\"}",
            "apikey: 'k-1'",
        ] {
            let issues = analyze("settings.js", line);
            assert_eq!(issues.len(), 1, "missed credential in {line:?}");
            assert_eq!(issues[0].severity, Severity::Critical);
        }

        assert!(analyze("config.py", "password = os.environ[\"PW\"]").is_empty());
        assert!(analyze("lexer.js", "const tokenizer = 'basic';").is_empty());
    }

    #[test]
    fn console_log_skipped_in_test_files() {
        let src = "console.log('debug');";
        let issues = analyze("src/app.js", src);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Low);

        assert!(analyze("src/app.test.js", src).is_empty());
        assert!(analyze("src/app.spec.ts", src).is_empty());
    }

    #[test]
    fn oversized_file_flagged() {
        let content = "x\n".repeat(DEFAULT_MAX_LINES + 1);
        let issues = analyze("big.rs", &content);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].category, CATEGORY_MAINTAINABILITY);
        assert_eq!(issues[0].severity, Severity::Medium);

        let exact = "x\n".repeat(DEFAULT_MAX_LINES);
        assert!(analyze("ok.rs", &exact).is_empty());
    }

    #[test]
    fn custom_line_threshold() {
        let analyzer = HeuristicAnalyzer::new().with_max_lines(2);
        let issues = analyzer.analyze(&ReviewFile::new("a.rs", "1\n2\n3\n"));
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn missing_properties_yield_nothing() {
        let analyzer = HeuristicAnalyzer::new();
        assert!(analyzer.analyze(&ReviewFile::default()).is_empty());
        assert!(analyzer
            .analyze(&ReviewFile {
                path: Some("a.js".to_string()),
                content: None,
            })
            .is_empty());
        assert!(analyzer
            .analyze(&ReviewFile {
                path: None,
                content: Some("eval(x)".to_string()),
            })
            .is_empty());
    }

    #[test]
    fn each_rule_reports_once_per_file() {
        let issues = analyze("a.js", "eval(a)\neval(b)\neval(c)\n");
        assert_eq!(issues.len(), 1);
    }
}
