//! Compiles regex literals on first use within a single match/scan call and
//! reuses the result for the rest of that call — a key pattern like `/a.*/`
//! is otherwise recompiled once per candidate key it is probed against.

use std::collections::HashMap;
use std::rc::Rc;

use regex::{Regex, RegexBuilder};

#[derive(Default)]
pub(crate) struct RegexCache {
    compiled: HashMap<(String, String), Option<Rc<Regex>>>,
}

impl RegexCache {
    /// Returns `None` if the pattern fails to compile against the given
    /// flags; this is not expected to happen for tokenizer-accepted regex
    /// literals, but a failing compile is treated as a silent non-match
    /// rather than a panic.
    pub(crate) fn get_or_compile(&mut self, pattern: &str, flags: &str) -> Option<Rc<Regex>> {
        let key = (pattern.to_string(), flags.to_string());
        self.compiled
            .entry(key)
            .or_insert_with(|| {
                let mut builder = RegexBuilder::new(pattern);
                builder
                    .case_insensitive(flags.contains('i'))
                    .multi_line(flags.contains('m'))
                    .dot_matches_new_line(flags.contains('s'));
                builder.build().ok().map(Rc::new)
            })
            .clone()
    }
}
