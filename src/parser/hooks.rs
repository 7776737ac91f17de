//! Parse-time observation hooks, mirroring the teacher's `Log` trait: a
//! no-op by default, wired to `log::trace!` by [`NullParserHooks`], and
//! overridable so embedders can trace the productions the parser commits
//! to without the parser itself depending on any particular logger.

pub trait ParserHooks {
    fn on_enter(&mut self, _rule: &'static str, _token_index: usize) {}
    fn on_exit(&mut self, _rule: &'static str, _token_index: usize, _success: bool) {}
}

/// Default hook implementation: emits `trace`-level logs via the `log`
/// facade, exactly as far as a production tool should go without an
/// embedder opting into anything heavier.
pub struct NullParserHooks;

impl ParserHooks for NullParserHooks {
    fn on_enter(&mut self, rule: &'static str, token_index: usize) {
        log::trace!("enter {rule} at token {token_index}");
    }

    fn on_exit(&mut self, rule: &'static str, token_index: usize, success: bool) {
        log::trace!("exit {rule} at token {token_index} ({})", if success { "ok" } else { "backtrack" });
    }
}
