use anyhow::Result;
use confedit_core::{FormatterState, Source};

pub fn run(source: &Source) -> Result<String> {
    let mut state = FormatterState::new();
    state.emit_source(source);
    Ok(state.finish())
}
