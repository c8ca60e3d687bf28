//! Render result handler (pipeline steps 5-6)

use crate::commands::Cmd;
use crate::model::AppModel;
use crate::render::RenderResult;

pub fn update_render(model: &mut AppModel, result: RenderResult) -> Option<Cmd> {
    let Some(window) = model.window_mut(result.window) else {
        tracing::debug!("Dropping render for closed {}", result.window);
        return None;
    };

    let applied = window.apply_render(result.revision, &result.output.html);
    if applied {
        tracing::debug!(
            "{}: rendered rev {} in {:?}",
            result.window,
            result.revision,
            result.output.elapsed
        );
        if result.output.failed {
            model.set_status("Could not parse Markdown");
        }
    }
    None
}
