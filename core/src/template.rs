// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Trivial templating engine.
//!
//! Templates are static strings, usually loaded with `include_str!`, in which `%key%` markers are
//! substituted by values supplied at render time.  Values are inserted verbatim: callers must pass
//! untrusted data through `escape` first.

/// Templating errors.  These indicate a mismatch between a template and the values provided to
/// render it, which is always a programming error.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum TemplateError {
    /// Indicates that two values were provided for the same key.
    #[error("Found two values for replacement {0}")]
    DuplicateKey(String),

    /// Indicates that the template references a key for which no value was provided.
    #[error("No replacement for {0} but it must have been defined")]
    MissingKey(String),

    /// Indicates that the template ends in the middle of a `%key%` marker.
    #[error("Unterminated replacement {0}")]
    Unterminated(String),
}

/// Result type for this module.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Performs various named string replacements in `input` based on `replacements`.
///
/// The `input` string can have `%key%` strings in it where `key` must appear in `replacements` and
/// which will be replaced by its corresponding value.  Raw `%` characters can be escaped via `%%`
/// and nested expansions are not supported.
pub fn apply(input: &'static str, replacements: &[(&'static str, &str)]) -> TemplateResult<String> {
    let mut output = String::with_capacity(input.len());
    let mut partial_key: Option<String> = None;
    for ch in input.chars() {
        if ch == '%' {
            match partial_key {
                Some(key) if key.is_empty() => {
                    output.push('%');
                    partial_key = None;
                }
                Some(key) => {
                    let mut values =
                        replacements.iter().filter(|(candidate, _)| *candidate == key.as_str());
                    match (values.next(), values.next()) {
                        (Some((_, value)), None) => output.push_str(value),
                        (Some(_), Some(_)) => return Err(TemplateError::DuplicateKey(key)),
                        (None, _) => return Err(TemplateError::MissingKey(key)),
                    }
                    partial_key = None;
                }
                None => partial_key = Some(String::new()),
            }
        } else {
            match partial_key.as_mut() {
                Some(k) => k.push(ch),
                None => output.push(ch),
            }
        }
    }
    match partial_key {
        Some(key) => Err(TemplateError::Unterminated(key)),
        None => Ok(output),
    }
}

/// Escapes `input` so that it can be safely embedded in HTML text and attribute values.
pub fn escape(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            ch => output.push(ch),
        }
    }
    output
}
