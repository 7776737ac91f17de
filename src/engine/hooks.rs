//! Match-time observation hooks (spec §4.7), mirroring [`crate::parser::ParserHooks`]:
//! a no-op by default, wired to `log::trace!` by [`NullEngineHooks`]. Hooks are
//! invoked synchronously and never influence the outcome of a match.

use crate::path::{Path, SiteKind};
use crate::value::Value;

pub trait EngineHooks {
    fn on_enter(&mut self, _node_kind: &'static str, _path: &Path) {}
    fn on_exit(&mut self, _node_kind: &'static str, _path: &Path, _matched: bool) {}
    fn on_bind(&mut self, _kind: SiteKind, _name: &str, _value: &Value) {}
}

pub struct NullEngineHooks;

impl EngineHooks for NullEngineHooks {
    fn on_enter(&mut self, node_kind: &'static str, path: &Path) {
        log::trace!("enter {node_kind} at {path}");
    }

    fn on_exit(&mut self, node_kind: &'static str, path: &Path, matched: bool) {
        log::trace!("exit {node_kind} at {path} ({})", if matched { "matched" } else { "failed" });
    }

    fn on_bind(&mut self, kind: SiteKind, name: &str, value: &Value) {
        log::trace!("bind {kind:?} {name} = {value}");
    }
}
