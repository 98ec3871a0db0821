use std::collections::HashMap;

use regex::Regex;

/// Value of a form control as far as validation is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checkbox(bool),
}

impl FieldValue {
    /// Whether the field carries something worth marking as a success.
    pub fn has_content(&self) -> bool {
        match self {
            FieldValue::Text(value) => !value.trim().is_empty(),
            FieldValue::Checkbox(checked) => *checked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Validity {
    #[default]
    Unvalidated,
    Valid,
    Invalid(String),
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }
}

#[derive(Debug, Clone)]
pub enum Check {
    Required,
    MinLength(usize),
    Pattern(Regex),
}

impl Check {
    fn passes(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Check::Required, FieldValue::Checkbox(checked)) => *checked,
            (Check::Required, FieldValue::Text(text)) => !text.trim().is_empty(),
            // Measured in UTF-16 code units, as the browser reports a value's length.
            (Check::MinLength(min), FieldValue::Text(text)) => {
                text.trim().encode_utf16().count() >= *min
            }
            (Check::Pattern(pattern), FieldValue::Text(text)) => pattern.is_match(text.trim()),
            // Length and pattern checks only constrain text.
            (_, FieldValue::Checkbox(_)) => true,
        }
    }
}

/// Ordered checks for one field, evaluated until the first failure. Every
/// check reports the rule's single message.
#[derive(Debug, Clone)]
pub struct Rule {
    checks: Vec<Check>,
    message: String,
}

impl Rule {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            message: message.into(),
        }
    }

    pub fn required(mut self) -> Self {
        self.checks.push(Check::Required);
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.checks.push(Check::MinLength(min));
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.checks.push(Check::Pattern(pattern));
        self
    }

    pub fn validate(&self, value: &FieldValue) -> Validity {
        if self.checks.iter().all(|check| check.passes(value)) {
            Validity::Valid
        } else {
            Validity::Invalid(self.message.clone())
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<String, Rule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, field: impl Into<String>, rule: Rule) -> Self {
        self.rules.insert(field.into(), rule);
        self
    }

    /// Validity of `field` holding `value`, or `None` when the field has no
    /// rule and so is never marked either way.
    pub fn validate(&self, field: &str, value: &FieldValue) -> Option<Validity> {
        self.rules.get(field).map(|rule| rule.validate(value))
    }

    /// Rules for the contact form.
    pub fn contact_defaults() -> Self {
        Self::new()
            .with_rule(
                "name",
                Rule::new("お名前を入力してください").required().min_length(1),
            )
            .with_rule(
                "email",
                Rule::new("正しいメールアドレスを入力してください")
                    .required()
                    .pattern(compile(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")),
            )
            .with_rule(
                "phone",
                Rule::new("正しい電話番号を入力してください（例：03-1234-5678）")
                    .required()
                    .min_length(10)
                    .pattern(compile(r"^[0-9\-+()\s]+$")),
            )
            .with_rule(
                "message",
                Rule::new("お問い合わせ内容を10文字以上入力してください")
                    .required()
                    .min_length(10),
            )
            .with_rule(
                "privacy",
                Rule::new("プライバシーポリシーに同意してください").required(),
            )
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("rule patterns are valid regexes")
}
