//! Unit tests for descriptor loading and resolution.

use super::*;
use crate::artifact::Scope;
use rstest::{fixture, rstest};

const MINIMAL: &str = r#"
[project]
group_id = "org.example"
artifact_id = "adapter"
version = "1.0.0"
"#;

#[fixture]
fn minimal() -> RarConfig {
    toml::from_str(MINIMAL).expect("minimal descriptor parses")
}

#[rstest]
fn defaults_follow_the_conventional_layout(minimal: RarConfig) {
    let settings = minimal.resolve(Utf8Path::new("/work")).expect("resolve");

    assert_eq!(settings.project.basedir, "/work");
    assert_eq!(settings.project.build_directory, "/work/target");
    assert_eq!(settings.project.final_name, "adapter-1.0.0");
    assert_eq!(settings.rar_source_directory, "/work/src/main/rar");
    assert_eq!(settings.ra_xml_file, "/work/src/main/rar/META-INF/ra.xml");
    assert_eq!(settings.manifest_file, "/work/src/main/rar/META-INF/MANIFEST.MF");
    assert_eq!(settings.work_directory, "/work/target/adapter-1.0.0");
    assert_eq!(settings.output_directory, "/work/target");
    assert!(settings.include_jar);
    assert!(settings.warn_on_missing_ra_xml);
    assert!(!settings.skip);
    assert!(!settings.filter_rar_source_directory);
    assert!(settings.classifier.is_none());
    assert!(settings.output_timestamp.is_none());
    assert!(settings.filtering.escape_windows_paths);
    assert!(settings.filtering.use_default_delimiters);
    assert!(settings.archive.compress);
    assert!(!settings.archive.add_default_entries);
}

#[rstest]
fn moving_the_source_directory_moves_descriptor_defaults() {
    let source = format!("{MINIMAL}\n[rar]\nrar_source_directory = \"connector\"\n");
    let settings = toml::from_str::<RarConfig>(&source)
        .expect("parse")
        .resolve(Utf8Path::new("/work"))
        .expect("resolve");

    assert_eq!(settings.ra_xml_file, "/work/connector/META-INF/ra.xml");
    assert_eq!(settings.manifest_file, "/work/connector/META-INF/MANIFEST.MF");
}

#[rstest]
fn explicit_paths_resolve_against_basedir() {
    let source = r#"
[project]
group_id = "org.example"
artifact_id = "adapter"
version = "1.0.0"
basedir = "module"
build_directory = "/tmp/build"
final_name = "custom"
source_encoding = "UTF-8"

[[dependency]]
group_id = "org.example"
artifact_id = "client"
version = "2.1"
scope = "runtime"
file = "lib/client-2.1.jar"

[rar]
output_directory = "dist"
filters = ["filters/rar.properties"]

[[rar.rar_resources]]
directory = "extra"
target_path = "docs"
filtering = true
"#;
    let settings = toml::from_str::<RarConfig>(source)
        .expect("parse")
        .resolve(Utf8Path::new("/work"))
        .expect("resolve");

    assert_eq!(settings.project.basedir, "/work/module");
    assert_eq!(settings.work_directory, "/tmp/build/custom");
    assert_eq!(settings.output_directory, "/work/module/dist");
    assert_eq!(settings.encoding.as_deref(), Some("UTF-8"));
    assert_eq!(settings.filters, ["/work/module/filters/rar.properties"]);

    let dependency = settings.dependencies.first().expect("one dependency");
    assert_eq!(dependency.file, "/work/module/lib/client-2.1.jar");
    assert_eq!(dependency.scope, Some(Scope::Runtime));

    let resource = settings.rar_resources.first().expect("one resource set");
    assert_eq!(resource.directory, "/work/module/extra");
    assert_eq!(resource.target_path.as_deref(), Some(Utf8Path::new("docs")));
    assert!(resource.filtering);
}

#[rstest]
fn dotted_property_keys_flatten() {
    let source = format!(
        "{MINIMAL}\n[project.properties]\njndi.name = \"eis/Adapter\"\npool.size = 8\nenabled = true\n"
    );
    let config = toml::from_str::<RarConfig>(&source).expect("parse");

    let properties = &config.project.properties;
    assert_eq!(properties["jndi.name"], "eis/Adapter");
    assert_eq!(properties["pool.size"], "8");
    assert_eq!(properties["enabled"], "true");
}

#[rstest]
fn array_properties_are_rejected() {
    let source = format!("{MINIMAL}\n[project.properties]\nlist = [1, 2]\n");
    assert!(toml::from_str::<RarConfig>(&source).is_err());
}

#[rstest]
#[case::top_level("unexpected = true\n")]
#[case::rar_table("[rar]\nunexpected = true\n")]
#[case::archive_table("[rar.archive]\nunexpected = true\n")]
fn rejects_unknown_fields(#[case] extra: &str) {
    let source = format!("{MINIMAL}\n{extra}");
    let outcome = toml::from_str::<RarConfig>(&source);
    assert!(outcome.is_err(), "expected unknown field to be rejected");
}

#[rstest]
fn missing_coordinates_fail_to_parse() {
    let outcome = toml::from_str::<RarConfig>("[project]\ngroup_id = \"org.example\"\n");
    assert!(outcome.is_err());
}

#[rstest]
fn blank_coordinates_fail_to_resolve() {
    let source = MINIMAL.replace("\"1.0.0\"", "\"  \"");
    let err = toml::from_str::<RarConfig>(&source)
        .expect("parse")
        .resolve(Utf8Path::new("/work"))
        .expect_err("blank version");
    assert!(matches!(err, ConfigError::EmptyCoordinate { field: "version" }));
}

#[rstest]
fn invalid_timestamps_fail_to_resolve() {
    let source = format!("{MINIMAL}\n[rar]\noutput_timestamp = \"1979-01-01T00:00:00Z\"\n");
    let err = toml::from_str::<RarConfig>(&source)
        .expect("parse")
        .resolve(Utf8Path::new("/work"))
        .expect_err("out of range");
    assert!(matches!(err, ConfigError::Timestamp(_)));
}

#[rstest]
fn overrides_replace_descriptor_values() {
    let source = format!(
        "{MINIMAL}\n[rar]\nclassifier = \"descriptor\"\nwarn_on_missing_ra_xml = true\n"
    );
    let mut config = toml::from_str::<RarConfig>(&source).expect("parse");
    config.apply(ConfigOverrides {
        skip: true,
        classifier: Some("cli".to_owned()),
        output_timestamp: Some("1704067200".to_owned()),
        filter_rar_source_directory: true,
        no_warn_on_missing_ra_xml: true,
        user_properties: BTreeMap::from([("jndi.name".to_owned(), "eis/Cli".to_owned())]),
    });
    let settings = config.resolve(Utf8Path::new("/work")).expect("resolve");

    assert!(settings.skip);
    assert!(settings.filter_rar_source_directory);
    assert!(!settings.warn_on_missing_ra_xml);
    assert_eq!(settings.classifier.as_ref().map(Classifier::as_str), Some("cli"));
    assert_eq!(
        settings.output_timestamp.map(|ts| ts.unix_seconds()),
        Some(1_704_067_200)
    );
    assert_eq!(settings.project.user_properties["jndi.name"], "eis/Cli");
}

#[rstest]
fn empty_overrides_keep_descriptor_values() {
    let source = format!("{MINIMAL}\n[rar]\nclassifier = \"descriptor\"\nskip = true\n");
    let mut config = toml::from_str::<RarConfig>(&source).expect("parse");
    config.apply(ConfigOverrides::default());
    let settings = config.resolve(Utf8Path::new("/work")).expect("resolve");

    assert!(settings.skip);
    assert_eq!(
        settings.classifier.as_ref().map(Classifier::as_str),
        Some("descriptor")
    );
}

#[rstest]
fn load_reports_missing_descriptor() {
    let err = RarSettings::load(
        Utf8Path::new("/definitely/not/here/rar.toml"),
        ConfigOverrides::default(),
    )
    .expect_err("missing descriptor");
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[rstest]
fn load_resolves_against_the_descriptor_directory() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
    let descriptor = root.join(DEFAULT_DESCRIPTOR);
    std::fs::write(&descriptor, MINIMAL).expect("write descriptor");

    let settings = RarSettings::load(&descriptor, ConfigOverrides::default()).expect("load");
    let canonical_root = root.canonicalize_utf8().expect("canonical root");
    assert_eq!(settings.project.basedir, canonical_root);
    assert_eq!(settings.output_directory, canonical_root.join("target"));
}
