//! View setting message handlers

use crate::commands::Cmd;
use crate::messages::ViewMsg;
use crate::model::{EngineState, ScopeMode};
use crate::theme::ThemeKind;

pub fn update_view(state: &mut EngineState, msg: ViewMsg) -> Option<Cmd> {
    match msg {
        ViewMsg::SetOpacity(opacity) => {
            state.opacity = opacity.clamp(0.0, 1.0);
            restyle(state)
        }
        ViewMsg::ToggleContrast => {
            state.contrast = state.contrast.toggled();
            restyle(state)
        }
        ViewMsg::CycleStyle => {
            state.style_mode = state.style_mode.cycled();
            restyle(state)
        }
        ViewMsg::SetStyle(style) => {
            if state.style_mode == style {
                return None;
            }
            state.style_mode = style;
            restyle(state)
        }
        ViewMsg::ThemeChanged { is_light } => {
            let theme = ThemeKind::from_is_light(is_light);
            if state.theme == theme {
                return None;
            }
            state.theme = theme;
            // Theme is reported by the host, not a user preference
            state.refresh_all();
            Some(Cmd::RenderNow)
        }
        ViewMsg::ToggleScope => {
            state.scope_mode = state.scope_mode.toggled();
            let label = match state.scope_mode {
                ScopeMode::SingleDocument => "Highlighting the focused document",
                ScopeMode::AllOpenDocuments => "Highlighting all open documents",
            };
            Some(Cmd::batch(vec![
                Cmd::RenderNow,
                Cmd::SaveConfig,
                Cmd::info(label),
            ]))
        }
        ViewMsg::ToggleVisibility => {
            state.highlights_disabled = !state.highlights_disabled;
            Some(Cmd::RenderNow)
        }
    }
}

/// Rebind every entry with the new style settings
fn restyle(state: &mut EngineState) -> Option<Cmd> {
    state.refresh_all();
    Some(Cmd::batch(vec![Cmd::RenderNow, Cmd::SaveConfig]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AddOptions, ContrastMode, HighlightSource, StyleMode};
    use crate::theme::ColorKey;

    #[test]
    fn test_opacity_is_clamped_and_keeps_entries() {
        let mut state = EngineState::new();
        state
            .add_highlight(
                "a",
                AddOptions::default().source(HighlightSource::profile("P")),
            )
            .unwrap();
        let color = state.registry.get("a").unwrap().color;

        update_view(&mut state, ViewMsg::SetOpacity(1.5));
        assert_eq!(state.opacity, 1.0);
        let entry = state.registry.get("a").unwrap();
        assert_eq!(entry.color, color);
        assert_eq!(entry.source, HighlightSource::profile("P"));
    }

    #[test]
    fn test_style_commands() {
        let mut state = EngineState::new();
        update_view(&mut state, ViewMsg::CycleStyle);
        assert_eq!(state.style_mode, StyleMode::Fill);
        assert!(update_view(&mut state, ViewMsg::SetStyle(StyleMode::Fill)).is_none());
        update_view(&mut state, ViewMsg::ToggleContrast);
        assert_eq!(state.contrast, ContrastMode::Force);
    }

    #[test]
    fn test_theme_change_rebinds_without_recoloring() {
        let mut state = EngineState::new();
        state
            .add_highlight("a", AddOptions::default().color(ColorKey::Palette(4)))
            .unwrap();
        let revision = state.registry.get("a").unwrap().binding_revision;

        let cmd = update_view(&mut state, ViewMsg::ThemeChanged { is_light: true });
        assert_eq!(cmd, Some(Cmd::RenderNow));
        let entry = state.registry.get("a").unwrap();
        assert_ne!(entry.binding_revision, revision);
        assert_eq!(entry.color, ColorKey::Palette(4));

        assert!(update_view(&mut state, ViewMsg::ThemeChanged { is_light: true }).is_none());
    }

    #[test]
    fn test_visibility_toggle_keeps_data() {
        let mut state = EngineState::new();
        state.add_highlight("a", AddOptions::default()).unwrap();
        update_view(&mut state, ViewMsg::ToggleVisibility);
        assert!(state.highlights_disabled);
        assert_eq!(state.registry.len(), 1);
        update_view(&mut state, ViewMsg::ToggleVisibility);
        assert!(!state.highlights_disabled);
    }
}
