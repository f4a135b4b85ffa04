//! Common test utilities for rpa-speckit integration tests

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Primary spec text that passes the default validation policy
pub const VALID_SPEC: &str = "# Invoice posting\n\n\
    Built on the T2C Framework. The robot opens the ERP in the browser, \
    reads every pending invoice from the queue and posts it to the ledger.\n";

pub const BUSINESS_RULES: &str = "# Business rules\n\n\
    ### VAL001: Invoice number is present\n\
    ### VAL002: Amount is positive\n\
    ### COND001: Skip invoices flagged as disputed\n\
    ### REG001: Round amounts to two decimals\n";

pub const TASKS: &str = "# Tasks\n\n\
    ## Phase 1\n\n\
    ### Task 1.1: Read the invoice spreadsheet\n\
    ### Task 1.2: add_to_queue every invoice row\n\n\
    ## Phase 2\n\n\
    ### Task 2.1: Open the invoice in the ERP\n\
    ### Task 2.2: Post the invoice\n";

/// A temporary directory holding spec directories and generated output
#[allow(dead_code)]
pub struct TestWorkspace {
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Output directory used by the tests
    pub fn output_dir(&self) -> PathBuf {
        self.path.join("output")
    }

    /// Write the four unit documents under `dir` (relative to the workspace)
    pub fn write_unit(&self, dir: &str, spec: &str) {
        self.write_file(&format!("{dir}/spec.md"), spec);
        self.write_file(&format!("{dir}/selectors.md"), "# Selectors\n\n- invoice grid: #grid\n");
        self.write_file(&format!("{dir}/business-rules.md"), BUSINESS_RULES);
        self.write_file(&format!("{dir}/tests.md"), "# Tests\n\n- posts one invoice\n");
    }

    /// Standalone spec at `specs/<name>`
    pub fn standalone_spec(&self, name: &str) -> PathBuf {
        let dir = format!("specs/{name}");
        self.write_unit(&dir, VALID_SPEC);
        self.write_file(&format!("{dir}/tasks.md"), TASKS);
        self.path.join(dir)
    }

    /// Multi-robot spec at `specs/<name>` with one valid `robotN/` per index
    pub fn multi_robot_spec(&self, name: &str, units: &[u32]) -> PathBuf {
        let dir = format!("specs/{name}");
        for index in units {
            self.write_unit(&format!("{dir}/robot{index}"), VALID_SPEC);
        }
        self.write_file(&format!("{dir}/tasks.md"), TASKS);
        self.path.join(dir)
    }
}

/// Commit `files` into a fresh git repository at `dir`
#[allow(dead_code)]
pub fn create_git_repo(dir: &Path, files: &[(&str, &str)]) {
    let repo = git2::Repository::init(dir).expect("Failed to init repository");
    let mut index = repo.index().expect("Failed to open index");
    for (path, content) in files {
        let full = dir.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&full, content).expect("Failed to write file");
        index.add_path(Path::new(path)).expect("Failed to stage file");
    }
    index.write().expect("Failed to write index");
    let tree_id = index.write_tree().expect("Failed to write tree");
    let tree = repo.find_tree(tree_id).expect("Failed to find tree");
    let signature =
        git2::Signature::now("test", "test@example.com").expect("Failed to create signature");
    repo.commit(Some("HEAD"), &signature, &signature, "framework", &tree, &[])
        .expect("Failed to commit");
}
