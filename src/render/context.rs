//! Building the template context for one unit
//!
//! Turns a spec bundle into the replacement text for every token of the
//! template set. Blocks carry their own indentation so they drop into the
//! method bodies of the templates as-is. A block without fragments becomes a
//! single neutral comment line, never an empty string.

use serde::Serialize;

use crate::config::ExtractionPolicy;
use crate::extract::{self, ExtractedFragment, TagFamily};
use crate::specs::{DocumentKind, SpecBundle, package_name};

use super::tokens::{
    APP_INITIALIZATION, APP_TEARDOWN, IMPORTS, INPUT_VALIDATIONS, MAIN_PROCESSING,
    PACKAGE_NAME, PROCESSING_RULES, PROJECT_DESCRIPTION, PROJECT_NAME, QUEUE_FILL,
    SPECIAL_CONDITIONS,
};
use super::{TemplateContext, neutralize_markers};

const METHOD_INDENT: &str = "        ";
const TRY_INDENT: &str = "            ";

const BROWSER_WORDS: [&str; 2] = ["browser", "navegador"];

/// How many fragments fed each block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FragmentCounts {
    pub validations: usize,
    pub conditions: usize,
    pub processing_rules: usize,
    pub tasks: usize,
}

impl TemplateContext {
    /// Context for one unit, see [`build_context`]
    pub fn for_unit(
        bundle: &SpecBundle,
        project_name: &str,
        policy: &ExtractionPolicy,
    ) -> (Self, FragmentCounts) {
        build_context(bundle, project_name, policy)
    }
}

/// Build the full context for every template of the set
pub fn build_context(
    bundle: &SpecBundle,
    project_name: &str,
    policy: &ExtractionPolicy,
) -> (TemplateContext, FragmentCounts) {
    let rules = bundle.text(DocumentKind::BusinessRules);
    let tasks = bundle.text(DocumentKind::Tasks);

    let validations = extract::extract_tagged(rules, TagFamily::Validation);
    let conditions = extract::extract_tagged(rules, TagFamily::Condition);
    let processing_rules = extract::extract_tagged(rules, TagFamily::ProcessingRule);
    let process_tasks = extract::extract_task_refs(tasks, policy.process_phase);

    let counts = FragmentCounts {
        validations: validations.len().min(policy.max_fragments),
        conditions: conditions.len().min(policy.max_fragments),
        processing_rules: processing_rules.len().min(policy.max_fragments),
        tasks: process_tasks.len(),
    };

    let name = neutralize_markers(project_name);
    let context = TemplateContext::new()
        .with(PROJECT_NAME, name.clone())
        .with(PACKAGE_NAME, package_name(project_name))
        .with(
            PROJECT_DESCRIPTION,
            format!("RPA automation {name} generated by rpa-speckit"),
        )
        .with(IMPORTS, imports_block(bundle))
        .with(
            INPUT_VALIDATIONS,
            fragment_block(
                &validations[..counts.validations],
                "TODO: implement validation",
                "No input validations defined",
            ),
        )
        .with(
            SPECIAL_CONDITIONS,
            fragment_block(
                &conditions[..counts.conditions],
                "TODO: implement condition",
                "No special conditions defined",
            ),
        )
        .with(
            PROCESSING_RULES,
            fragment_block(
                &processing_rules[..counts.processing_rules],
                "TODO: implement rule",
                "No processing rules defined",
            ),
        )
        .with(
            MAIN_PROCESSING,
            task_block(&process_tasks, policy.process_phase),
        )
        .with(QUEUE_FILL, queue_fill_block(tasks, policy.queue_phase))
        .with(APP_INITIALIZATION, initialization_block(tasks))
        .with(APP_TEARDOWN, teardown_block());

    (context, counts)
}

/// Import lines derived from keywords in the selectors and plan documents
fn imports_block(bundle: &SpecBundle) -> String {
    let selectors = bundle.text(DocumentKind::Selectors);
    let stack = format!(
        "{}\n{}",
        bundle.text(DocumentKind::Plan),
        bundle.text(DocumentKind::Spec)
    );

    let mut imports = Vec::new();
    if extract::mentions(selectors, &["clicknium"]) {
        imports.push("from clicknium import clicknium as cc, locator");
    }
    if extract::mentions(&stack, &["pandas"]) {
        imports.push("import pandas as pd");
    }
    imports.push("from time import sleep");
    if extract::mentions(&stack, &BROWSER_WORDS) {
        imports.push("from botcity.web import Browser");
    }
    imports.join("\n")
}

fn comment_line(indent: &str, text: &str) -> String {
    format!("{indent}# {text}")
}

fn fragment_block(fragments: &[ExtractedFragment], todo: &str, empty: &str) -> String {
    if fragments.is_empty() {
        return comment_line(METHOD_INDENT, empty);
    }

    fragments
        .iter()
        .map(|fragment| {
            format!(
                "{}\n{}\n",
                comment_line(
                    METHOD_INDENT,
                    &format!(
                        "{}: {}",
                        fragment.label(),
                        neutralize_markers(&fragment.description)
                    )
                ),
                comment_line(METHOD_INDENT, todo)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn task_block(tasks: &[ExtractedFragment], phase: u32) -> String {
    if tasks.is_empty() {
        return comment_line(METHOD_INDENT, "TODO: implement main processing");
    }

    tasks
        .iter()
        .map(|task| {
            format!(
                "{}\n{}\n",
                comment_line(
                    METHOD_INDENT,
                    &format!(
                        "Task {phase}.{}: {}",
                        task.ordinal,
                        neutralize_markers(&task.description)
                    )
                ),
                comment_line(METHOD_INDENT, "TODO: implement")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Queue population scaffold when the tasks describe one
fn queue_fill_block(tasks: &str, phase: u32) -> String {
    let has_queue_task = extract::extract_task_refs(tasks, phase)
        .iter()
        .any(|task| task.ordinal == 2)
        || extract::mentions(tasks, &["add_to_queue"]);

    if !has_queue_task {
        return comment_line(METHOD_INDENT, "TODO: implement queue population");
    }

    [
        "TODO: implement queue population",
        "Example:",
        "import pandas as pd",
        "df = pd.read_excel('data.xlsx')",
        "for index, row in df.iterrows():",
        "    var_dictInfoAdicional = {'field1': row['field1']}",
        "    QueueManager.insert_new_queue_item(",
        "        arg_strReferencia=str(row['id']),",
        "        arg_dictInfAdicional=var_dictInfoAdicional",
        "    )",
    ]
    .iter()
    .map(|line| comment_line(METHOD_INDENT, line))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Browser start-up when the tasks mention one
fn initialization_block(tasks: &str) -> String {
    if !extract::mentions(tasks, &BROWSER_WORDS) {
        return comment_line(TRY_INDENT, "TODO: implement application start-up");
    }

    [
        "# Start the browser",
        "InitAllSettings.initiate_web_manipulator(",
        "    arg_boolHeadless=False,",
        "    arg_brwBrowserEscolhido=Browser.CHROME,",
        "    arg_strPastaDownload=r\"C:\\Downloads\"",
        ")",
        "",
        "# Navigate to the start page",
        "# InitAllSettings.var_botWebbot.navigate_to(\"https://example.com\")",
    ]
    .iter()
    .map(|line| {
        if line.is_empty() {
            String::new()
        } else {
            format!("{TRY_INDENT}{line}")
        }
    })
    .collect::<Vec<_>>()
    .join("\n")
}

fn teardown_block() -> String {
    [
        "# Close the browser",
        "if InitAllSettings.var_botWebbot is not None:",
        "    InitAllSettings.var_botWebbot.stop_browser()",
        "",
        "# Close other applications if needed",
        "# subprocess.run(['taskkill', '/F', '/IM', 'application.exe'])",
    ]
    .iter()
    .map(|line| {
        if line.is_empty() {
            String::new()
        } else {
            format!("{TRY_INDENT}{line}")
        }
    })
    .collect::<Vec<_>>()
    .join("\n")
}
