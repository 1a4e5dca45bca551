//! Unit tests for the default resource filter.

use super::*;
use rstest::{fixture, rstest};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    fn source(&self) -> Utf8PathBuf {
        self.root.join("src")
    }

    fn output(&self) -> Utf8PathBuf {
        self.root.join("out")
    }

    fn write(&self, relative: &str, contents: impl AsRef<[u8]>) -> Utf8PathBuf {
        let path = self.source().join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        fs::write(&path, contents).expect("write source");
        path
    }

    fn read_output(&self, relative: &str) -> String {
        fs::read_to_string(self.output().join(relative)).expect("read output")
    }

    fn execution(&self, resource: ResourceSet) -> ResourcesExecution {
        ResourcesExecution {
            resources: vec![resource],
            output_directory: self.output(),
            encoding: Some("UTF-8".to_owned()),
            filters: Vec::new(),
            properties: BTreeMap::from([
                ("project.version".to_owned(), "1.0.0".to_owned()),
                ("name".to_owned(), "adapter".to_owned()),
            ]),
            options: FilteringOptions::default(),
        }
    }
}

#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
    Workspace { _dir: dir, root }
}

#[rstest]
fn copies_tree_verbatim_without_filtering(workspace: Workspace) {
    workspace.write("META-INF/notes.txt", "version ${project.version}");
    workspace.write("top.txt", "top");

    let written = PropertyResourceFilter
        .filter_resources(&workspace.execution(ResourceSet::new(workspace.source())))
        .expect("copy resources");

    assert_eq!(written.len(), 2);
    assert_eq!(
        workspace.read_output("META-INF/notes.txt"),
        "version ${project.version}"
    );
    assert_eq!(workspace.read_output("top.txt"), "top");
}

#[rstest]
fn filtering_substitutes_known_tokens(workspace: Workspace) {
    workspace.write(
        "info.txt",
        "v=${project.version} n=@name@ u=${unknown} e=\\${name}",
    );
    let mut execution = workspace.execution(ResourceSet::new(workspace.source()).with_filtering(true));
    execution.options.escape_string = Some("\\".to_owned());

    PropertyResourceFilter
        .filter_resources(&execution)
        .expect("filter resources");

    assert_eq!(
        workspace.read_output("info.txt"),
        "v=1.0.0 n=adapter u=${unknown} e=${name}"
    );
}

#[rstest]
#[case::default_extension("logo.png")]
#[case::upper_case_extension("logo.PNG")]
#[case::configured_extension("store.jks")]
fn non_filtered_extensions_are_copied_as_bytes(workspace: Workspace, #[case] file: &str) {
    let bytes = b"\xff\xfe${project.version}";
    workspace.write(file, bytes);
    let mut execution = workspace.execution(ResourceSet::new(workspace.source()).with_filtering(true));
    execution.options.non_filtered_file_extensions = vec!["jks".to_owned()];

    PropertyResourceFilter
        .filter_resources(&execution)
        .expect("copy resources");

    let copied = fs::read(workspace.output().join(file)).expect("read copy");
    assert_eq!(copied, bytes);
}

#[rstest]
fn invalid_text_in_filtered_file_is_an_error(workspace: Workspace) {
    workspace.write("binary.dat", b"\xff\xfe\x00");
    let execution = workspace.execution(ResourceSet::new(workspace.source()).with_filtering(true));

    let err = PropertyResourceFilter
        .filter_resources(&execution)
        .expect_err("invalid utf-8");
    assert!(matches!(err, ResourceError::InvalidText { .. }));
}

#[rstest]
fn target_path_places_copies_below_output(workspace: Workspace) {
    workspace.write("readme.txt", "docs");
    let mut resource = ResourceSet::new(workspace.source());
    resource.target_path = Some(Utf8PathBuf::from("docs/extra"));

    PropertyResourceFilter
        .filter_resources(&workspace.execution(resource))
        .expect("copy resources");

    assert_eq!(workspace.read_output("docs/extra/readme.txt"), "docs");
}

#[rstest]
fn includes_and_excludes_select_files(workspace: Workspace) {
    workspace.write("a.txt", "a");
    workspace.write("nested/b.txt", "b");
    workspace.write("nested/skip.txt", "skip");
    workspace.write("c.xml", "c");
    let mut resource = ResourceSet::new(workspace.source());
    resource.includes = vec!["**/*.txt".to_owned()];
    resource.excludes = vec!["**/skip.txt".to_owned()];

    let written = PropertyResourceFilter
        .filter_resources(&workspace.execution(resource))
        .expect("copy resources");

    let mut names: Vec<String> = written
        .iter()
        .filter_map(|path| path.strip_prefix(workspace.output()).ok())
        .map(|path| path.as_str().replace('\\', "/"))
        .collect();
    names.sort();
    assert_eq!(names, ["a.txt", "nested/b.txt"]);
}

#[rstest]
fn scm_metadata_and_backups_are_excluded(workspace: Workspace) {
    workspace.write(".git/config", "[core]");
    workspace.write("kept.txt", "kept");
    workspace.write("kept.txt~", "backup");

    PropertyResourceFilter
        .filter_resources(&workspace.execution(ResourceSet::new(workspace.source())))
        .expect("copy resources");

    assert!(workspace.output().join("kept.txt").is_file());
    assert!(!workspace.output().join(".git").exists());
    assert!(!workspace.output().join("kept.txt~").exists());
}

#[rstest]
#[case::kept_when_not_overwriting(false, "existing")]
#[case::replaced_when_overwriting(true, "fresh")]
fn overwrite_controls_up_to_date_destinations(
    workspace: Workspace,
    #[case] overwrite: bool,
    #[case] expected: &str,
) {
    let source = workspace.write("file.txt", "fresh");
    let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
    fs::File::options()
        .write(true)
        .open(&source)
        .and_then(|file| file.set_modified(old))
        .expect("age source");
    fs::create_dir_all(workspace.output()).expect("output dir");
    fs::write(workspace.output().join("file.txt"), "existing").expect("existing copy");

    let mut execution = workspace.execution(ResourceSet::new(workspace.source()));
    execution.options.overwrite = overwrite;
    PropertyResourceFilter
        .filter_resources(&execution)
        .expect("copy resources");

    assert_eq!(workspace.read_output("file.txt"), expected);
}

#[rstest]
fn filtered_copies_follow_changed_properties(workspace: Workspace) {
    workspace.write("META-INF/jndi.xml", "<jndi>${jndi.name}</jndi>");
    let mut execution = workspace.execution(ResourceSet::new(workspace.source()).with_filtering(true));

    for name in ["eis/First", "eis/Second"] {
        execution
            .properties
            .insert("jndi.name".to_owned(), name.to_owned());
        PropertyResourceFilter
            .filter_resources(&execution)
            .expect("filter resources");
        assert_eq!(
            workspace.read_output("META-INF/jndi.xml"),
            format!("<jndi>{name}</jndi>")
        );
    }
}

#[rstest]
#[case::enabled(true)]
#[case::disabled(false)]
fn empty_directories_follow_the_switch(workspace: Workspace, #[case] include: bool) {
    fs::create_dir_all(workspace.source().join("empty")).expect("empty dir");
    let mut execution = workspace.execution(ResourceSet::new(workspace.source()));
    execution.options.include_empty_dirs = include;

    PropertyResourceFilter
        .filter_resources(&execution)
        .expect("copy resources");

    assert_eq!(workspace.output().join("empty").is_dir(), include);
}

#[rstest]
fn missing_directory_is_skipped(workspace: Workspace) {
    let written = PropertyResourceFilter
        .filter_resources(&workspace.execution(ResourceSet::new(workspace.root.join("absent"))))
        .expect("missing directory is not an error");
    assert!(written.is_empty());
}

#[rstest]
#[case::latin1("ISO-8859-1")]
#[case::utf16("UTF-16")]
fn unsupported_encodings_are_rejected(workspace: Workspace, #[case] encoding: &str) {
    let mut execution = workspace.execution(ResourceSet::new(workspace.source()));
    execution.encoding = Some(encoding.to_owned());
    let err = PropertyResourceFilter
        .filter_resources(&execution)
        .expect_err("unsupported encoding");
    assert!(matches!(err, ResourceError::UnsupportedEncoding(_)));
}

#[rstest]
#[case("UTF-8")]
#[case("utf8")]
#[case("Utf_8")]
fn utf8_spellings_are_accepted(#[case] name: &str) {
    assert!(check_encoding(Some(name)).is_ok());
}

#[rstest]
fn execution_properties_override_filter_files(workspace: Workspace) {
    let filter = workspace.root.join("filter.properties");
    fs::write(&filter, "name=from-file\nonly.in.file=yes\n").expect("filter file");
    workspace.write("out.txt", "${name} ${only.in.file}");

    let mut execution = workspace.execution(ResourceSet::new(workspace.source()).with_filtering(true));
    execution.filters = vec![filter];
    PropertyResourceFilter
        .filter_resources(&execution)
        .expect("filter resources");

    assert_eq!(workspace.read_output("out.txt"), "adapter yes");
}

#[rstest]
fn invalid_patterns_are_reported(workspace: Workspace) {
    workspace.write("a.txt", "a");
    let mut resource = ResourceSet::new(workspace.source());
    resource.includes = vec!["[unclosed".to_owned()];

    let err = PropertyResourceFilter
        .filter_resources(&workspace.execution(resource))
        .expect_err("bad pattern");
    assert!(matches!(err, ResourceError::InvalidPattern { .. }));
}
