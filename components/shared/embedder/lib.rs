/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Types and hooks implemented by the embedding application.
//!
//! The DOM decides *when* a script may run; actually fetching and running it
//! is the embedder's job, reached through the traits in this crate. Failures
//! inside a dispatched script flow back through [`ScriptErrorReporter`] and
//! must never propagate into the DOM operation that triggered the dispatch.

#![deny(unsafe_code)]

use std::fmt;

use log::warn;
use url::Url;

/// The scripting policy of the browsing context that owns a document.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RunScripts {
    /// Execute document scripts in the document's scripting context.
    Dangerously,
    /// A scripting context exists, but document scripts never run in it.
    OutsideOnly,
    /// No scripting context at all.
    #[default]
    Disabled,
}

/// A classic script that must be fetched before it can be evaluated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExternalScript {
    /// The `src` reference, already resolved against the document base URL.
    pub url: Url,
    /// Line the parser saw the owning element on, for diagnostics.
    pub line_number: u64,
}

/// A classic script queued for evaluation from inline element text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InlineScript {
    /// The literal concatenated child text of the owning element.
    pub text: String,
    /// Base URL of the owning document at dispatch time.
    pub base_url: Url,
    pub line_number: u64,
}

/// The two dispatch effects a script element can hand off.
///
/// The DOM invokes each method at most once per element on its own; an
/// implementation must eventually either run the script or fail silently,
/// reporting through the owning document's error channel.
pub trait ScriptDispatcher {
    /// Fetch `script` and eventually evaluate it.
    fn dispatch_external_script(&self, script: ExternalScript);

    /// Evaluate inline source text in the document's scripting context.
    fn dispatch_inline_script(&self, script: InlineScript);
}

/// Dispatcher that drops every script on the floor, for configurations that
/// build document trees without a script engine attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullScriptDispatcher;

impl ScriptDispatcher for NullScriptDispatcher {
    fn dispatch_external_script(&self, _: ExternalScript) {}

    fn dispatch_inline_script(&self, _: InlineScript) {}
}

/// A failure inside a dispatched script.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScriptError {
    /// The external resource could not be fetched, or the `src` reference
    /// never produced a usable URL.
    Fetch(String),
    Compile(String),
    Runtime(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Fetch(msg) => write!(f, "script fetch error: {}", msg),
            ScriptError::Compile(msg) => write!(f, "script compile error: {}", msg),
            ScriptError::Runtime(msg) => write!(f, "script runtime error: {}", msg),
        }
    }
}

impl std::error::Error for ScriptError {}

/// The document's generic script-error reporting channel.
pub trait ScriptErrorReporter {
    fn report_script_error(&self, error: &ScriptError);
}

/// Reporter that only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogErrorReporter;

impl ScriptErrorReporter for LogErrorReporter {
    fn report_script_error(&self, error: &ScriptError) {
        warn!("{}", error);
    }
}
