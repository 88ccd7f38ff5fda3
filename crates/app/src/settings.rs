use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use quiz_core::model::{ConfigError, QuestionBank, SessionConfig};

/// How many questions to ask per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionLimit {
    Count(u32),
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLimitError(String);

impl fmt::Display for ParseLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected a positive number or \"all\", got {:?}", self.0)
    }
}

impl std::error::Error for ParseLimitError {}

impl FromStr for QuestionLimit {
    type Err = ParseLimitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        match trimmed.parse::<u32>() {
            Ok(n) if n > 0 => Ok(Self::Count(n)),
            _ => Err(ParseLimitError(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for QuestionLimit {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u32),
            Word(String),
        }

        let raw = Raw::deserialize(deserializer)?;
        let text = match raw {
            Raw::Count(n) => n.to_string(),
            Raw::Word(word) => word,
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl QuestionLimit {
    /// Resolve against a bank; `All` asks for every question.
    #[must_use]
    pub fn count_for(self, bank: &QuestionBank) -> u32 {
        match self {
            Self::Count(n) => n,
            Self::All => u32::try_from(bank.len()).unwrap_or(u32::MAX).max(1),
        }
    }
}

//
// ─── CLI ───────────────────────────────────────────────────────────────────────
//

#[derive(Parser, Debug)]
#[command(name = "quiz", about = "Timed multiple-choice quiz in the terminal")]
pub struct Args {
    /// Questions per session: a number or "all" (start screen offers 5, 10, all).
    #[arg(long, env = "QUIZ_QUESTIONS")]
    pub questions: Option<QuestionLimit>,

    /// Seconds allowed per question (start screen offers 8, 12, 20).
    #[arg(long, env = "QUIZ_SECONDS")]
    pub seconds: Option<u32>,

    /// Question bank file (.toml or .json). Defaults to the built-in bank.
    #[arg(long, env = "QUIZ_BANK")]
    pub bank: Option<PathBuf>,

    /// Settings file layered under flags and environment.
    #[arg(long, default_value = "quiz.toml")]
    pub config: PathBuf,

    /// Print questions without the fade-in effect.
    #[arg(long)]
    pub no_animate: bool,

    /// Fixed shuffle seed, for reproducible question order.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Optional `quiz.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub questions: Option<QuestionLimit>,
    pub seconds_per_question: Option<u32>,
    pub bank: Option<PathBuf>,
    pub animate: Option<bool>,
}

impl FileSettings {
    /// Read the file if it exists. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }
}

//
// ─── RESOLVED SETTINGS ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub questions: QuestionLimit,
    pub seconds_per_question: u32,
    pub bank: Option<PathBuf>,
    pub animate: bool,
    pub seed: Option<u64>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            questions: QuestionLimit::Count(SessionConfig::DEFAULT_QUESTION_COUNT),
            seconds_per_question: SessionConfig::DEFAULT_SECONDS_PER_QUESTION,
            bank: None,
            animate: true,
            seed: None,
        }
    }
}

impl AppSettings {
    /// Flags and environment win over the file; the file wins over defaults.
    #[must_use]
    pub fn resolve(args: Args, file: FileSettings) -> Self {
        let defaults = Self::default();
        Self {
            questions: args.questions.or(file.questions).unwrap_or(defaults.questions),
            seconds_per_question: args
                .seconds
                .or(file.seconds_per_question)
                .unwrap_or(defaults.seconds_per_question),
            bank: args.bank.or(file.bank),
            animate: !args.no_animate && file.animate.unwrap_or(defaults.animate),
            seed: args.seed,
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError` when the seconds budget is zero.
    pub fn session_config(&self, bank: &QuestionBank) -> Result<SessionConfig, ConfigError> {
        SessionConfig::new(self.questions.count_for(bank), self.seconds_per_question)
    }
}

/// Load the configured bank, or the built-in one.
///
/// # Errors
///
/// Fails when the file cannot be read, parsed, or holds no questions.
pub fn load_bank(path: Option<&Path>) -> anyhow::Result<QuestionBank> {
    let Some(path) = path else {
        return Ok(QuestionBank::builtin());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading question bank {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let bank = if is_json {
        QuestionBank::from_json_str(&raw)
    } else {
        QuestionBank::from_toml_str(&raw)
    }
    .with_context(|| format!("loading question bank {}", path.display()))?;

    if bank.is_empty() {
        return Err(ConfigError::EmptyBank)
            .with_context(|| format!("question bank {}", path.display()));
    }
    Ok(bank)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["quiz"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn limit_parses_numbers_and_all() {
        assert_eq!("5".parse::<QuestionLimit>().unwrap(), QuestionLimit::Count(5));
        assert_eq!("ALL".parse::<QuestionLimit>().unwrap(), QuestionLimit::All);
        assert!("0".parse::<QuestionLimit>().is_err());
        assert!("many".parse::<QuestionLimit>().is_err());
    }

    #[test]
    fn all_resolves_to_bank_size() {
        let bank = QuestionBank::builtin();
        assert_eq!(QuestionLimit::All.count_for(&bank), 10);
        assert_eq!(QuestionLimit::Count(3).count_for(&bank), 3);
    }

    #[test]
    fn flags_override_file() {
        let file: FileSettings = toml::from_str(
            r#"
                questions = "all"
                seconds_per_question = 20
                animate = true
            "#,
        )
        .unwrap();
        let settings = AppSettings::resolve(args(&["--seconds", "8", "--no-animate"]), file);
        assert_eq!(settings.questions, QuestionLimit::All);
        assert_eq!(settings.seconds_per_question, 8);
        assert!(!settings.animate);
    }

    #[test]
    fn file_accepts_numeric_limit() {
        let file: FileSettings = toml::from_str("questions = 5").unwrap();
        assert_eq!(file.questions, Some(QuestionLimit::Count(5)));
        assert!(toml::from_str::<FileSettings>("colour = \"red\"").is_err());
    }

    #[test]
    fn defaults_without_file_or_flags() {
        let settings = AppSettings::resolve(args(&[]), FileSettings::default());
        assert_eq!(settings, AppSettings::default());
        let config = settings.session_config(&QuestionBank::builtin()).unwrap();
        assert_eq!(config.question_count(), 10);
        assert_eq!(config.seconds_per_question(), 12);
    }

    #[test]
    fn zero_seconds_is_rejected() {
        let settings = AppSettings::resolve(args(&["--seconds", "0"]), FileSettings::default());
        assert_eq!(
            settings.session_config(&QuestionBank::builtin()).unwrap_err(),
            ConfigError::InvalidSecondsPerQuestion
        );
    }

    #[test]
    fn missing_bank_path_uses_builtin() {
        assert_eq!(load_bank(None).unwrap().len(), 10);
        assert!(load_bank(Some(Path::new("/definitely/not/here.toml"))).is_err());
    }
}
