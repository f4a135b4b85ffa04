//! End-to-end generation through the library API, without network access

mod common;

use common::TestWorkspace;
use rpa_speckit::config::GeneratorConfig;
use rpa_speckit::generate::{GenerationOutcome, GenerationRequest, Pipeline, Stage, generate};
use rpa_speckit::specs::UnitId;
use rpa_speckit::SpeckitError;
use std::path::Path;

fn offline_request(spec_dir: &Path, output_dir: &Path) -> GenerationRequest {
    GenerationRequest {
        spec_dir: spec_dir.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        skip_framework_download: true,
        ..GenerationRequest::default()
    }
}

fn pipeline() -> Pipeline {
    Pipeline::from_config(GeneratorConfig::default()).unwrap()
}

#[test]
fn test_standalone_spec_generates_single_project() {
    let workspace = TestWorkspace::new();
    let spec_dir = workspace.standalone_spec("001-invoices");

    let outcome = generate(&offline_request(&spec_dir, &workspace.output_dir()), &pipeline()).unwrap();

    let GenerationOutcome::Single(result) = &outcome else {
        panic!("standalone spec must yield a single result");
    };
    assert!(result.success);
    assert_eq!(result.stage, Stage::Complete);
    assert_eq!(result.project_name, "invoices");
    assert!(result.unit_id.is_none());
    assert!(result.errors.is_empty());
    assert_eq!(result.fragments.validations, 2);
    assert_eq!(result.fragments.conditions, 1);
    assert_eq!(result.fragments.processing_rules, 1);
    assert_eq!(result.fragments.tasks, 2);

    for file in [
        "output/invoices/requirements.txt",
        "output/invoices/setup.py",
        "output/invoices/README.md",
        "output/invoices/invoices/bot.py",
        "output/invoices/invoices/__init__.py",
        "output/invoices/invoices/classes_t2c/__init__.py",
        "output/invoices/invoices/classes_t2c/framework/T2CProcess.py",
        "output/invoices/invoices/classes_t2c/framework/T2CInitAllApplications.py",
        "output/invoices/invoices/classes_t2c/framework/T2CCloseAllApplications.py",
    ] {
        assert!(workspace.file_exists(file), "{file} not generated");
    }
    assert!(!workspace.file_exists("output/invoices/invoices/classes_t2c/framework/T2CLoopStation.py"));

    let process = workspace.read_file("output/invoices/invoices/classes_t2c/framework/T2CProcess.py");
    assert!(process.contains("# VAL001: Invoice number is present"));
    assert!(process.contains("# VAL002: Amount is positive"));
    assert!(process.contains("# COND001: Skip invoices flagged as disputed"));
    assert!(process.contains("# REG001: Round amounts to two decimals"));
    assert!(process.contains("# Task 2.1: Open the invoice in the ERP"));
    assert!(!process.contains("{{"), "unresolved token left in T2CProcess.py");

    let init = workspace.read_file("output/invoices/invoices/__init__.py");
    assert!(init.contains("# invoices - T2C Framework"));
}

#[test]
fn test_every_rendered_file_is_free_of_tokens() {
    let workspace = TestWorkspace::new();
    let spec_dir = workspace.standalone_spec("001-invoices");
    generate(&offline_request(&spec_dir, &workspace.output_dir()), &pipeline()).unwrap();

    for entry in walkdir::WalkDir::new(workspace.output_dir()) {
        let entry = entry.unwrap();
        if entry.file_type().is_file() {
            let text = std::fs::read_to_string(entry.path()).unwrap();
            assert!(!text.contains("{{"), "{} has unresolved tokens", entry.path().display());
        }
    }
}

#[test]
fn test_multi_robot_units_generate_in_numeric_order() {
    let workspace = TestWorkspace::new();
    let spec_dir = workspace.multi_robot_spec("002-payroll", &[1, 10, 2]);

    let outcome = generate(&offline_request(&spec_dir, &workspace.output_dir()), &pipeline()).unwrap();

    let GenerationOutcome::Multiple(results) = &outcome else {
        panic!("multi-robot spec must yield multiple results");
    };
    let labels: Vec<String> = results.iter().map(|r| r.project_name.clone()).collect();
    assert_eq!(labels, ["payroll-robot1", "payroll-robot2", "payroll-robot10"]);
    assert!(outcome.is_success());

    for name in &labels {
        let package = name.replace('-', "_");
        assert!(workspace.file_exists(&format!("output/{name}/{package}/bot.py")));
    }
    let bot = workspace.read_file("output/payroll-robot2/payroll_robot2/bot.py");
    assert!(bot.contains("payroll-robot2"));
    let setup = workspace.read_file("output/payroll-robot2/setup.py");
    assert!(setup.contains(r#"name="payroll_robot2""#));
}

#[test]
fn test_invalid_unit_does_not_stop_siblings() {
    let workspace = TestWorkspace::new();
    let spec_dir = workspace.multi_robot_spec("002-payroll", &[1, 2]);
    workspace.write_file("specs/002-payroll/robot1/spec.md", "# Draft\n");

    let outcome = generate(&offline_request(&spec_dir, &workspace.output_dir()), &pipeline()).unwrap();

    let results = outcome.results();
    assert_eq!(results.len(), 2);
    assert!(!results[0].success);
    assert_eq!(results[0].stage, Stage::SpecsLoaded);
    let fatal = results[0].fatal_error().unwrap();
    assert_eq!(fatal.code, "speckit::spec::validation_failed");
    assert!(results[1].success);
    assert!(!outcome.is_success());
    assert!(!workspace.file_exists("output/payroll-robot1"));
}

#[test]
fn test_filtered_unit_failure_is_returned_as_error() {
    let workspace = TestWorkspace::new();
    let spec_dir = workspace.multi_robot_spec("002-payroll", &[1, 2]);
    std::fs::remove_file(spec_dir.join("robot2/selectors.md")).unwrap();

    let mut request = offline_request(&spec_dir, &workspace.output_dir());
    request.unit = UnitId::new(2);
    let err = generate(&request, &pipeline()).unwrap_err();
    assert!(matches!(err, SpeckitError::MissingDocument { .. }));

    request.unit = UnitId::new(1);
    let outcome = generate(&request, &pipeline()).unwrap();
    assert!(matches!(outcome, GenerationOutcome::Single(ref r) if r.success));
    assert!(workspace.file_exists("output/payroll-robot1/payroll_robot1/bot.py"));
    assert!(!workspace.file_exists("output/payroll-robot2"));
}

#[test]
fn test_unknown_unit_filter() {
    let workspace = TestWorkspace::new();
    let spec_dir = workspace.multi_robot_spec("002-payroll", &[1]);

    let mut request = offline_request(&spec_dir, &workspace.output_dir());
    request.unit = UnitId::new(3);
    let err = generate(&request, &pipeline()).unwrap_err();
    assert!(matches!(err, SpeckitError::UnitNotFound { ref unit, .. } if unit == "robot3"));
}

#[test]
fn test_force_generates_despite_validation_failure() {
    let workspace = TestWorkspace::new();
    let spec_dir = workspace.standalone_spec("001-invoices");
    workspace.write_file("specs/001-invoices/spec.md", "# Draft\n");

    let mut request = offline_request(&spec_dir, &workspace.output_dir());
    request.force = true;
    let outcome = generate(&request, &pipeline()).unwrap();

    let result = &outcome.results()[0];
    assert!(result.success);
    assert_eq!(result.warnings().count(), 1);
    assert!(workspace.file_exists("output/invoices/invoices/bot.py"));
}

#[test]
fn test_explicit_project_name_and_base_config() {
    let workspace = TestWorkspace::new();
    let spec_dir = workspace.standalone_spec("001-invoices");
    workspace.write_file("specs/001-invoices/config/base.md", "- **NomeProjeto:** ledger\n");

    let outcome = generate(&offline_request(&spec_dir, &workspace.output_dir()), &pipeline()).unwrap();
    assert_eq!(outcome.results()[0].project_name, "ledger");

    let mut request = offline_request(&spec_dir, &workspace.output_dir());
    request.project_name = Some("override".to_string());
    let outcome = generate(&request, &pipeline()).unwrap();
    assert_eq!(outcome.results()[0].project_name, "override");
    assert!(workspace.file_exists("output/override/override/bot.py"));
}

#[test]
fn test_regeneration_replaces_previous_output() {
    let workspace = TestWorkspace::new();
    let spec_dir = workspace.standalone_spec("001-invoices");
    let request = offline_request(&spec_dir, &workspace.output_dir());

    generate(&request, &pipeline()).unwrap();
    workspace.write_file("output/invoices/stale.txt", "old");
    generate(&request, &pipeline()).unwrap();

    assert!(!workspace.file_exists("output/invoices/stale.txt"));
    assert!(workspace.file_exists("output/invoices/invoices/bot.py"));
}

#[test]
fn test_base_config_name_cannot_escape_output_dir() {
    let workspace = TestWorkspace::new();
    let spec_dir = workspace.standalone_spec("001-invoices");
    workspace.write_file("specs/001-invoices/config/base.md", "- **NomeProjeto:** ../victim\n");
    workspace.write_file("victim/precious.txt", "keep me");

    let err = generate(&offline_request(&spec_dir, &workspace.output_dir()), &pipeline()).unwrap_err();
    assert!(matches!(err, SpeckitError::InvalidProjectName { ref name, .. } if name == "../victim"));
    assert_eq!(workspace.read_file("victim/precious.txt"), "keep me");
    assert!(!workspace.file_exists("output"));
}

#[test]
fn test_names_matching_scratch_dirs_generate_normally() {
    let workspace = TestWorkspace::new();
    let spec_dir = workspace.standalone_spec("001-invoices");

    for name in ["template", "framework"] {
        let mut request = offline_request(&spec_dir, &workspace.output_dir());
        request.project_name = Some(name.to_string());
        let outcome = generate(&request, &pipeline()).unwrap();
        assert!(outcome.is_success());
        assert!(workspace.file_exists(&format!("output/{name}/{name}/bot.py")));
    }
}

#[test]
fn test_config_documents_land_in_config_sheet() {
    let workspace = TestWorkspace::new();
    let spec_dir = workspace.standalone_spec("001-invoices");
    workspace.write_file(
        "specs/001-invoices/config/base.md",
        "- **NomeProjeto:** invoices\n- **Ambiente:** PRD\n",
    );
    workspace.write_file("specs/001-invoices/config/email.md", "- **Destino:** ops@example.com\n");

    generate(&offline_request(&spec_dir, &workspace.output_dir()), &pipeline()).unwrap();

    let sheet = workspace.read_file("output/invoices/invoices/resources/config/Config.md");
    assert!(sheet.contains("Config.xlsx"));
    assert!(sheet.contains("## base"));
    assert!(sheet.contains("**Ambiente:** PRD"));
    assert!(sheet.contains("## email"));
    assert!(sheet.find("## base") < sheet.find("## email"));
}
