use multiview_core::error::MultiviewError;
use multiview_core::pipeline::config::{
    CorrectionBounds, PipelineConfig, ReconstructionOverrides, ReconstructionParams,
};
use multiview_core::pipeline::PipelineStage;
use multiview_core::views::{ViewRole, ViewSpec};

fn assert_config_error(config: &PipelineConfig) {
    match config.validate() {
        Err(MultiviewError::Config(_)) => {}
        other => panic!("expected config error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn test_default_config_is_valid() {
    let config = PipelineConfig::default();
    config.validate().unwrap();
    assert!(config.use_original_as_primary);
    assert_eq!(config.views.len(), 4);
    assert_eq!(config.primary_view().unwrap().role, ViewRole::Primary);
    assert_eq!(config.complementary_views().len(), 3);
}

#[test]
fn test_default_view_rotations() {
    let config = PipelineConfig::default();
    let rotations: Vec<f32> = config.views.iter().map(|v| v.rotation_degrees).collect();
    assert_eq!(rotations, vec![0.0, -45.0, 45.0, 180.0]);
}

#[test]
fn test_default_correction_bounds() {
    let bounds = CorrectionBounds::default();
    assert_eq!(bounds.min, 0.8);
    assert_eq!(bounds.max, 1.2);
    assert_eq!(bounds.clamp(1.5), 1.2);
    assert_eq!(bounds.clamp(0.1), 0.8);
    assert_eq!(format!("{bounds}"), "0.80x-1.20x");
}

#[test]
fn test_default_thresholds_and_timeouts() {
    let config = PipelineConfig::default();
    assert_eq!(config.validation.channel_threshold, 50.0);
    assert_eq!(config.validation.contrast_threshold, 40.0);
    assert_eq!(config.backends.edit_timeout_secs, 120);
    assert_eq!(config.backends.reconstruction_timeout_secs, 600);
    assert!(!config.output.save_generated_files);
}

// ---------------------------------------------------------------------------
// TOML
// ---------------------------------------------------------------------------

#[test]
fn test_partial_toml_fills_defaults() {
    let config: PipelineConfig = toml::from_str(
        r#"
        use_original_as_primary = false

        [correction]
        max = 1.5

        [reconstruction]
        slat_steps = 20
        "#,
    )
    .unwrap();
    assert!(!config.use_original_as_primary);
    assert_eq!(config.correction.min, 0.8);
    assert_eq!(config.correction.max, 1.5);
    assert_eq!(config.reconstruction.slat_steps, 20);
    assert_eq!(config.reconstruction.sparse_structure_steps, 8);
    assert_eq!(config.views.len(), 4);
    config.validate().unwrap();
}

#[test]
fn test_custom_views_from_toml() {
    let config: PipelineConfig = toml::from_str(
        r#"
        [[views]]
        role = "primary"
        rotation_degrees = 0.0
        prompt = "Keep as is"

        [[views]]
        role = "back"
        rotation_degrees = 180.0
        prompt = "Show the back"
        "#,
    )
    .unwrap();
    config.validate().unwrap();
    assert_eq!(config.complementary_views().len(), 1);
    assert_eq!(config.complementary_views()[0].role, ViewRole::Back);
}

#[test]
fn test_default_config_survives_toml() {
    let text = toml::to_string(&PipelineConfig::default()).unwrap();
    let parsed: PipelineConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed.views, PipelineConfig::default().views);
    assert_eq!(parsed.reconstruction, ReconstructionParams::default());
    assert_eq!(parsed.backends, PipelineConfig::default().backends);
}

#[test]
fn test_unknown_role_rejected() {
    let result: Result<PipelineConfig, _> = toml::from_str(
        r#"
        [[views]]
        role = "top"
        rotation_degrees = 0.0
        prompt = "x"
        "#,
    );
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_empty_views_rejected() {
    let mut config = PipelineConfig::default();
    config.views.clear();
    assert_config_error(&config);
}

#[test]
fn test_first_view_must_be_primary() {
    let mut config = PipelineConfig::default();
    config.views.swap(0, 1);
    assert_config_error(&config);
    assert!(config.primary_view().is_none());
}

#[test]
fn test_duplicate_roles_rejected() {
    let mut config = PipelineConfig::default();
    config
        .views
        .push(ViewSpec::new(ViewRole::Back, 180.0, "again"));
    assert_config_error(&config);
}

#[test]
fn test_bounds_must_straddle_one() {
    let mut config = PipelineConfig::default();
    config.correction = CorrectionBounds { min: 1.1, max: 1.2 };
    assert_config_error(&config);
    config.correction = CorrectionBounds { min: 0.8, max: 0.9 };
    assert_config_error(&config);
    config.correction = CorrectionBounds { min: 0.0, max: 1.2 };
    assert_config_error(&config);
}

#[test]
fn test_negative_threshold_rejected() {
    let mut config = PipelineConfig::default();
    config.validation.contrast_threshold = -1.0;
    assert_config_error(&config);
}

#[test]
fn test_nan_threshold_from_toml_rejected() {
    let config: PipelineConfig = toml::from_str(
        r#"
        [validation]
        channel_threshold = nan
        "#,
    )
    .unwrap();
    assert!(config.validation.channel_threshold.is_nan());
    assert_config_error(&config);
}

#[test]
fn test_nan_contrast_threshold_rejected() {
    let mut config = PipelineConfig::default();
    config.validation.contrast_threshold = f64::NAN;
    assert_config_error(&config);
}

#[test]
fn test_non_finite_megapixels_rejected() {
    let config: PipelineConfig = toml::from_str(
        r#"
        [edit]
        megapixels = nan
        "#,
    )
    .unwrap();
    assert_config_error(&config);

    let mut config = PipelineConfig::default();
    config.edit.megapixels = f64::INFINITY;
    assert_config_error(&config);
}

#[test]
fn test_nan_bounds_rejected() {
    let mut config = PipelineConfig::default();
    config.correction.max = f64::NAN;
    assert_config_error(&config);
}

#[test]
fn test_config_errors_have_no_stage() {
    let err = PipelineConfig {
        views: Vec::new(),
        ..Default::default()
    }
    .validate()
    .unwrap_err();
    assert_eq!(err.stage(), None::<PipelineStage>);
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

#[test]
fn test_empty_overrides_keep_defaults() {
    let params = ReconstructionParams::default();
    assert_eq!(params.overridden(&ReconstructionOverrides::default()), params);
}

#[test]
fn test_overrides_replace_only_given_fields() {
    let params = ReconstructionParams::default().overridden(&ReconstructionOverrides {
        sparse_structure_cfg_strength: Some(5.0),
        num_oversamples: Some(1),
        ..Default::default()
    });
    assert_eq!(params.sparse_structure_cfg_strength, 5.0);
    assert_eq!(params.num_oversamples, 1);
    assert_eq!(params.slat_steps, 12);
}
