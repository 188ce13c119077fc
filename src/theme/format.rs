//! Mermaid `%%{init}%%` block generation

use super::palette::ThemeConfig;

/// Blend factors for the derived background tones
const SECONDARY_BKG_LIGHTEN: f32 = 0.1;
const TERTIARY_BKG_LIGHTEN: f32 = 0.2;
/// Blend factor for the cluster background derived from the secondary color
const CLUSTER_BKG_LIGHTEN: f32 = 0.8;

/// Render a palette as the Mermaid init directive that must lead the diagram text.
///
/// Pure: the same ten colors always give the same block.
pub fn format_theme_config(config: &ThemeConfig) -> String {
    let primary = config.primary.to_hex();
    let secondary = config.secondary.to_hex();
    let tertiary = config.tertiary.to_hex();
    let quaternary = config.quaternary.to_hex();
    let primary_text = config.primary_text.to_hex();
    let secondary_text = config.secondary_text.to_hex();
    let background = config.background.to_hex();
    let border = config.border.to_hex();
    let line = config.line.to_hex();
    let accent = config.accent.to_hex();

    let secondary_bkg = config.background.lighten(SECONDARY_BKG_LIGHTEN).to_hex();
    let tertiary_bkg = config.background.lighten(TERTIARY_BKG_LIGHTEN).to_hex();
    let cluster_bkg = config.secondary.lighten(CLUSTER_BKG_LIGHTEN).to_hex();

    format!(
        "%%{{init: {{
    'theme': 'base',
    'themeVariables': {{
        'primaryColor': '{primary}',
        'primaryTextColor': '{primary_text}',
        'primaryBorderColor': '{border}',
        'lineColor': '{line}',
        'secondaryColor': '{secondary}',
        'tertiaryColor': '{tertiary}',
        'background': '{background}',
        'mainBkg': '{background}',
        'secondaryBkg': '{secondary_bkg}',
        'tertiaryBkg': '{tertiary_bkg}',
        'primaryLabelColor': '{primary_text}',
        'secondaryLabelColor': '{secondary_text}',
        'tertiaryLabelColor': '{secondary_text}',
        'nodeBkg': '{primary}',
        'nodeTextColor': '{primary_text}',
        'edgeLabelBackground': '{background}',
        'clusterBkg': '{cluster_bkg}',
        'clusterBorder': '{secondary}',
        'fillType0': '{primary}',
        'fillType1': '{secondary}',
        'fillType2': '{tertiary}',
        'fillType3': '{quaternary}',
        'fillType4': '{accent}',
        'cScale0': '{primary}',
        'cScale1': '{secondary}',
        'cScale2': '{tertiary}'
    }}
}}}}%%"
    )
}

/// Prefix `text` with the formatted block and a newline
pub fn apply_theme(config: &ThemeConfig, text: &str) -> String {
    let block = format_theme_config(config);
    let mut out = String::with_capacity(block.len() + 1 + text.len());
    out.push_str(&block);
    out.push('\n');
    out.push_str(text);
    out
}
