#[allow(dead_code)]
mod common;

use multiview_core::editor::ViewEditorClient;
use multiview_core::error::MultiviewError;
use multiview_core::pipeline::config::EditConfig;
use multiview_core::views::{default_view_specs, ViewRole};

use common::{solid, ScriptedEdit};

fn no_resample() -> EditConfig {
    EditConfig {
        megapixels: 0.0,
        ..EditConfig::default()
    }
}

#[test]
fn test_request_carries_prompt_seed_and_params() {
    let params = EditConfig {
        num_inference_steps: 8,
        guidance_scale: 2.5,
        negative_prompt: "blurry".into(),
        megapixels: 0.0,
    };
    let backend = ScriptedEdit::new(|req| {
        assert_eq!(req.num_inference_steps, 8);
        assert_eq!(req.guidance_scale, 2.5);
        assert_eq!(req.negative_prompt, "blurry");
        Ok(req.image.clone())
    });
    let client = ViewEditorClient::new(backend.clone(), params);
    let specs = default_view_specs();

    let edited = client.edit_view(&solid(4, 4, [1, 2, 3]), &specs[3], 77).unwrap();

    assert_eq!(edited.seed, 77);
    let seen = backend.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, specs[3].prompt);
    assert_eq!(seen[0].1, 77);
}

#[test]
fn test_backend_failure_names_the_view() {
    let backend = ScriptedEdit::failing_on(&["left"]);
    let client = ViewEditorClient::new(backend, no_resample());
    let specs = default_view_specs();

    let err = client
        .edit_view(&solid(4, 4, [1, 2, 3]), &specs[1], 1)
        .unwrap_err();
    assert_eq!(err.role(), Some(ViewRole::LeftThreeQuarter));
    assert!(matches!(err, MultiviewError::ViewGeneration { .. }));
}

#[test]
fn test_empty_response_is_a_view_generation_error() {
    let backend = ScriptedEdit::new(|_| Ok(solid(0, 0, [0, 0, 0])));
    let client = ViewEditorClient::new(backend, no_resample());
    let specs = default_view_specs();

    let err = client
        .edit_view(&solid(4, 4, [1, 2, 3]), &specs[2], 1)
        .unwrap_err();
    assert_eq!(err.role(), Some(ViewRole::RightThreeQuarter));
}

#[test]
fn test_input_resampled_to_megapixel_budget() {
    let backend = ScriptedEdit::new(|req| {
        assert_eq!((req.image.width(), req.image.height()), (1448, 724));
        Ok(solid(8, 8, [0, 0, 0]))
    });
    let client = ViewEditorClient::new(backend, EditConfig::default());
    let specs = default_view_specs();
    client
        .edit_view(&solid(64, 32, [50, 50, 50]), &specs[1], 3)
        .unwrap();
}
