use std::fs;
use std::path::PathBuf;

use pears::config::{
    FontConfig, KdeConfig, LayoutConfig, LimitsConfig, MarginalConfig, PairsConfig,
    ScatterConfig, TruthsConfig,
};
use pears::style::{Color, Colormap, LineStyle};

fn unique_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "pears_config_restore_{}_{}",
        name,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    path
}

fn custom() -> PairsConfig {
    PairsConfig {
        marginal: MarginalConfig {
            color: Color::rgb(10, 20, 30),
            linewidth: 2.0,
            annotate: true,
        },
        scatter: ScatterConfig {
            enabled: false,
            color: Color::rgb(200, 0, 0),
            alpha: 0.5,
            thin: 3,
            rasterized: false,
            marker_size: 4.0,
            edge_color: Some(Color::WHITE),
        },
        truths: TruthsConfig {
            color: Color::rgb(0, 0, 255),
            linestyle: LineStyle::DashDot,
            linewidth: 0.75,
            z_order: 9,
        },
        kde: KdeConfig {
            color: Color::rgb(1, 2, 3),
            cmap: Colormap::Winter,
            levels: vec![1.0, 3.0],
            linewidth: 2.5,
            grid_points_1d: 128,
            grid_points_2d: 32,
        },
        limits: LimitsConfig {
            x_quantiles: Some([0.01, 0.99]),
            y_quantiles: Some([0.025, 0.975]),
        },
        layout: LayoutConfig {
            figsize_scaling: 3.0,
            hspace: 0.1,
            wspace: 0.2,
            max_ticks: 3,
            edge_color: Color::rgb(0x44, 0x44, 0x44),
            dpi: 72,
        },
        fonts: FontConfig {
            ticks: 9.0,
            labels: 14.0,
            annotation: 12.0,
        },
    }
}

#[test]
fn config_roundtrip_default_toml() {
    let default_cfg = PairsConfig::default();
    let text = toml::to_string_pretty(&default_cfg).expect("serialize default");
    let parsed = PairsConfig::from_toml_str(&text).expect("parse default");
    assert_eq!(parsed, default_cfg);
}

#[test]
fn config_load_custom_values() {
    let path = unique_path("custom.toml");
    let path_str = path.to_string_lossy().to_string();
    let custom = custom();
    assert!(custom.validate().is_ok());
    let text = toml::to_string_pretty(&custom).expect("serialize custom");
    fs::write(&path, text).expect("write custom config");

    let loaded = PairsConfig::load_or_default(&path_str);
    assert_eq!(loaded, custom);

    let _ = fs::remove_file(&path);
}

#[test]
fn config_missing_file_fallback() {
    let path = unique_path("missing.toml");
    let path_str = path.to_string_lossy().to_string();
    let _ = fs::remove_file(&path);

    let loaded = PairsConfig::load_or_default(&path_str);
    assert!(path.exists(), "missing config should be created");
    assert_eq!(loaded, PairsConfig::default());

    // Second load reads the commented file back to the same defaults.
    assert_eq!(PairsConfig::load_or_default(&path_str), loaded);

    let _ = fs::remove_file(&path);
}

#[test]
fn config_accepts_short_color_names() {
    let text = r##"
[truths]
color = "k"
linestyle = ":"

[marginal]
color = "#abc"
"##;
    let parsed = PairsConfig::from_toml_str(text).expect("parse short colors");
    assert_eq!(parsed.truths.color, Color::BLACK);
    assert_eq!(parsed.truths.linestyle, LineStyle::Dotted);
    assert_eq!(parsed.marginal.color, Color::rgb(0xAA, 0xBB, 0xCC));
}
