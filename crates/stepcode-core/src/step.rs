//! A single step: a code body paired with an explanatory note

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One unit of presented content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Heading shown above the code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    /// File name hint for the code pane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    /// Language hint, opaque to the diff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lang: Option<String>,
    #[serde(default)]
    code: String,
    #[serde(default)]
    desc: String,
}

impl Step {
    /// Create a step with no display hints
    pub fn new(code: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            desc: desc.into(),
            ..Self::default()
        }
    }

    /// Set the heading
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the file name hint
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the language hint
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Build a step from an untrusted value.
    ///
    /// Never fails: `code` and `desc` fall back to `""` when missing or not a
    /// string, the optional hints fall back to `None`. Anything that is not an
    /// object yields an empty step.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str);

        Self {
            title: text("title").map(str::to_owned),
            file: text("file").map(str::to_owned),
            lang: text("lang").map(str::to_owned),
            code: text("code").unwrap_or_default().to_owned(),
            desc: text("desc").unwrap_or_default().to_owned(),
        }
    }

    /// Raw source text
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Replace the source text
    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    /// Explanatory note shown with the code
    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// Replace the note
    pub fn set_desc(&mut self, desc: impl Into<String>) {
        self.desc = desc.into();
    }

    /// Get the heading, if set
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Set or clear the heading
    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// Get the file name hint, if set
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Set or clear the file name hint
    pub fn set_file(&mut self, file: Option<String>) {
        self.file = file;
    }

    /// Get the language hint, if set
    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// Set or clear the language hint
    pub fn set_lang(&mut self, lang: Option<String>) {
        self.lang = lang;
    }

    /// Lines of `code`, accepting both `\n` and `\r\n` endings.
    ///
    /// Empty code has no lines; a lone `"\n"` has two empty lines.
    pub fn code_lines(&self) -> Vec<&str> {
        if self.code.is_empty() {
            return Vec::new();
        }
        self.code
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect()
    }

    /// Number of lines in `code`; zero only for empty code
    pub fn code_line_count(&self) -> usize {
        self.code_lines().len()
    }

    /// Projection used for persistence, symmetric with [`Step::from_value`]
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        if let Some(title) = &self.title {
            map.insert("title".into(), Value::String(title.clone()));
        }
        if let Some(file) = &self.file {
            map.insert("file".into(), Value::String(file.clone()));
        }
        if let Some(lang) = &self.lang {
            map.insert("lang".into(), Value::String(lang.clone()));
        }
        map.insert("code".into(), Value::String(self.code.clone()));
        map.insert("desc".into(), Value::String(self.desc.clone()));
        Value::Object(map)
    }
}
