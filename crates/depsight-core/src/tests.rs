use std::collections::HashSet;

use super::*;

#[test]
fn parse_version_pads_missing_components() {
    let version = PackageVersion::parse("13.2").expect("version should parse");
    assert_eq!(version.to_string(), "13.2.0");
    assert_eq!(version, PackageVersion::new(13, 2, 0));
}

#[test]
fn parse_version_keeps_non_zero_revision_only() {
    let with_revision = PackageVersion::parse("4.7.0.1").expect("version should parse");
    assert_eq!(with_revision.to_string(), "4.7.0.1");
    assert_eq!(with_revision.revision(), 1);

    let zero_revision = PackageVersion::parse("4.7.0.0").expect("version should parse");
    assert_eq!(zero_revision, PackageVersion::new(4, 7, 0));
    assert!(with_revision > zero_revision);
}

#[test]
fn prerelease_sorts_before_release() {
    let preview = PackageVersion::parse("8.0.0-preview.1").expect("version should parse");
    let release = PackageVersion::parse("8.0.0").expect("version should parse");
    assert!(preview.is_prerelease());
    assert!(preview < release);
    assert_eq!(preview.to_string(), "8.0.0-preview.1");
}

#[test]
fn parse_version_rejects_garbage() {
    for raw in ["", "one.two", "1..2", "1.2.3.4.5", "1.0.0-"] {
        let err = PackageVersion::parse(raw).expect_err("version must be rejected");
        assert!(
            matches!(err, Error::InvalidVersion { .. }),
            "unexpected error for {raw:?}: {err}"
        );
    }
}

#[test]
fn parse_interval_ranges() {
    let open_ended = VersionRange::parse("[1.0.0, )").expect("range should parse");
    assert_eq!(open_ended.to_string(), "[1.0.0,)");
    assert!(open_ended.contains(&PackageVersion::new(1, 0, 0)));
    assert!(open_ended.contains(&PackageVersion::new(9, 0, 0)));
    assert!(!open_ended.contains(&PackageVersion::new(0, 9, 0)));

    let bounded = VersionRange::parse("[2.0.0,3.0.0)").expect("range should parse");
    assert_eq!(bounded.to_string(), "[2.0.0,3.0.0)");
    assert!(bounded.contains(&PackageVersion::new(2, 9, 9)));
    assert!(!bounded.contains(&PackageVersion::new(3, 0, 0)));

    let exclusive_min = VersionRange::parse("(1.0,2.0]").expect("range should parse");
    assert_eq!(exclusive_min.to_string(), "(1.0.0,2.0.0]");
    assert!(!exclusive_min.contains(&PackageVersion::new(1, 0, 0)));
    assert!(exclusive_min.contains(&PackageVersion::new(2, 0, 0)));
}

#[test]
fn floating_minimum_keeps_its_text_and_floor() {
    let range = VersionRange::parse("[1.*, )").expect("floating range should parse");
    assert_eq!(range.to_string(), "[1.*,)");
    let min = range.min.as_ref().expect("range has a minimum");
    assert_eq!(min.floating.as_deref(), Some("1.*"));
    assert_eq!(min.version, PackageVersion::new(1, 0, 0));
    assert!(range.contains(&PackageVersion::new(1, 4, 2)));
    assert!(!range.contains(&PackageVersion::new(0, 9, 0)));

    let prerelease = VersionRange::parse("1.0.0-*").expect("floating prerelease should parse");
    assert_eq!(prerelease.to_string(), "[1.0.0-*,)");
    let preview = PackageVersion::parse("1.0.0-preview.2").expect("version should parse");
    assert!(prerelease.contains(&preview));

    let labelled = VersionRange::parse("[2.1.*-beta*, 3.0.0)").expect("range should parse");
    assert_eq!(labelled.to_string(), "[2.1.*-beta*,3.0.0)");
    let both = VersionRange::parse("1.*-*").expect("floating core and label should parse");
    assert_eq!(both.to_string(), "[1.*-*,)");
}

#[test]
fn floating_versions_must_be_well_formed() {
    for raw in ["1*", "1.*.2", "[1.0.0, 2.*)", "[1.*]", "1.0.0-be*ta", "1.*-beta", "**"] {
        let err = VersionRange::parse(raw).expect_err("floating text must be rejected");
        assert!(
            matches!(err, Error::InvalidVersionRange { .. }),
            "unexpected error for {raw:?}: {err}"
        );
    }
}

#[test]
fn restore_output_accepts_floating_declarations() {
    let raw = r#"{
      "project": {
        "name": "P",
        "version": "1.0.0",
        "frameworks": [
          { "framework": "net8.0",
            "dependencies": [ { "name": "A", "version_range": "[1.*, )", "auto_referenced": true } ] }
        ]
      },
      "targets": [
        { "framework": "net8.0",
          "libraries": [ { "name": "A", "version": "1.3.0", "type": "package" } ] }
      ]
    }"#;

    let restore = RestoreOutput::from_json_str(raw).expect("floating range must not reject the file");
    let info = restore
        .framework_info(&TargetFramework::parse("net8.0").expect("framework should parse"))
        .expect("framework section exists");
    assert_eq!(
        info.dependencies[0].version_range.as_ref().map(ToString::to_string),
        Some("[1.*,)".to_string())
    );
}

#[test]
fn bare_version_means_minimum_inclusive() {
    let range = VersionRange::parse("6.0.1").expect("range should parse");
    assert_eq!(range, VersionRange::at_least(PackageVersion::new(6, 0, 1)));
    assert_eq!(range.to_string(), "[6.0.1,)");
}

#[test]
fn exact_and_unbounded_ranges_render_compactly() {
    let exact = VersionRange::parse("[1.2.3]").expect("range should parse");
    assert!(exact.is_exact());
    assert_eq!(exact.to_string(), "[1.2.3]");

    let all = VersionRange::parse("(,)").expect("range should parse");
    assert_eq!(all, VersionRange::all());
    assert_eq!(all.to_string(), "(,)");
}

#[test]
fn parse_range_rejects_inverted_and_empty_intervals() {
    for raw in ["[3.0.0,2.0.0]", "(1.0.0,1.0.0]", "(1.0.0)", "[1.0.0", ""] {
        let err = VersionRange::parse(raw).expect_err("range must be rejected");
        assert!(
            matches!(err, Error::InvalidVersionRange { .. }),
            "unexpected error for {raw:?}: {err}"
        );
    }
}

#[test]
fn package_names_compare_case_insensitively() {
    let upper = PackageName::new("Newtonsoft.Json");
    let lower = PackageName::new("newtonsoft.json");
    assert_eq!(upper, lower);
    assert_eq!(upper, "NEWTONSOFT.JSON");
    assert_eq!(upper.to_string(), "Newtonsoft.Json");

    let mut set = HashSet::new();
    set.insert(upper);
    assert!(!set.insert(lower), "folded names must hash identically");
}

#[test]
fn parse_short_and_long_framework_forms() {
    let short = TargetFramework::parse("net8.0").expect("framework should parse");
    assert_eq!(short.label(), "net8.0");
    assert_eq!(short, TargetFramework::parse("NET8.0").expect("framework should parse"));

    let cases = [
        (".NETCoreApp,Version=v8.0", "net8.0"),
        (".NETCoreApp,Version=v3.1", "netcoreapp3.1"),
        (".NETStandard,Version=v2.0", "netstandard2.0"),
        (".NETFramework,Version=v4.7.2", "net472"),
    ];
    for (long, expected) in cases {
        let parsed = TargetFramework::parse(long).expect("long form should parse");
        assert_eq!(parsed.label(), expected);
    }

    for raw in ["", "8.0", "net 8", ".Unknown,Version=v1.0"] {
        assert!(
            TargetFramework::parse(raw).is_err(),
            "framework {raw:?} must be rejected"
        );
    }
}

#[test]
fn selector_matches_framework_and_runtime_identifier() {
    let net8 = TargetFramework::parse("net8.0").expect("framework should parse");

    let plain = FrameworkSelector::parse(" net8.0 ").expect("selector should parse");
    assert!(plain.matches(&net8, None));
    assert!(!plain.matches(&net8, Some("linux-x64")));

    let with_rid = FrameworkSelector::parse("net8.0/Linux-X64").expect("selector should parse");
    assert_eq!(with_rid.runtime_identifier.as_deref(), Some("Linux-X64"));
    assert!(with_rid.matches(&net8, Some("linux-x64")));
    assert!(!with_rid.matches(&net8, None));

    assert!(FrameworkSelector::parse("/").is_err());
    assert!(FrameworkSelector::parse("net8.0/linux-x64/extra").is_err());
}

const RESTORE_JSON: &str = r#"{
  "project": {
    "name": "App",
    "version": "1.0.0",
    "frameworks": [
      {
        "framework": "net8.0",
        "dependencies": [
          { "name": "Serilog", "version_range": "[3.0.0, )" },
          { "name": "Microsoft.NETCore.App.Ref", "version_range": "[8.0.0]", "auto_referenced": true }
        ]
      }
    ]
  },
  "targets": [
    {
      "framework": "net8.0",
      "libraries": [
        { "name": "Serilog", "version": "3.1.1", "type": "package" },
        { "name": "Lib", "version": "1.0.0", "type": "project",
          "dependencies": [ { "name": "Serilog", "version_range": "3.0.0" } ] }
      ]
    },
    { "framework": "net8.0", "runtime_identifier": "linux-x64" }
  ]
}"#;

#[test]
fn parse_restore_output() {
    let restore = RestoreOutput::from_json_str(RESTORE_JSON).expect("restore output should parse");
    assert_eq!(restore.package_spec_name(), "app");
    assert_eq!(restore.package_spec_version(), &PackageVersion::new(1, 0, 0));
    assert_eq!(restore.targets().len(), 2);
    assert_eq!(restore.target_frameworks().len(), 1);

    let target = restore.primary_target().expect("single runtime-independent target");
    assert!(!target.is_runtime_specific());
    assert_eq!(target.libraries_of_kind(LibraryKind::Project).count(), 1);

    let lib = &target.libraries[1];
    assert!(lib.is_project());
    assert_eq!(
        lib.dependencies[0].version_range,
        VersionRange::at_least(PackageVersion::new(3, 0, 0))
    );

    let declared = &restore.target_frameworks()[0].dependencies;
    assert!(!declared[0].auto_referenced);
    assert!(declared[1].auto_referenced);
}

#[test]
fn validate_rejects_target_without_framework_section() {
    let raw = r#"{
      "project": { "name": "App", "version": "1.0.0", "frameworks": [] },
      "targets": [ { "framework": "net8.0" } ]
    }"#;
    let err = RestoreOutput::from_json_str(raw).expect_err("must reject inconsistent output");
    assert!(
        format!("{err:#}").contains("no dependency section for framework 'net8.0'"),
        "unexpected error: {err:#}"
    );
}

#[test]
fn validate_rejects_output_without_targets() {
    let raw = r#"{ "project": { "name": "App", "version": "1.0.0" } }"#;
    let err = RestoreOutput::from_json_str(raw).expect_err("must reject empty output");
    assert!(
        format!("{err:#}").contains("no target without a runtime identifier"),
        "unexpected error: {err:#}"
    );
}

#[test]
fn primary_target_requires_a_single_framework() {
    let raw = r#"{
      "project": { "name": "App", "version": "1.0.0",
        "frameworks": [ { "framework": "net8.0" }, { "framework": "net6.0" } ] },
      "targets": [ { "framework": "net8.0" }, { "framework": "net6.0" } ]
    }"#;
    let restore = RestoreOutput::from_json_str(raw).expect("restore output should parse");
    let err = restore.primary_target().expect_err("two frameworks are ambiguous");
    assert_eq!(
        err,
        Error::MultipleTargets {
            frameworks: vec!["net8.0".to_string(), "net6.0".to_string()],
        }
    );

    let net6 = TargetFramework::parse("net6.0").expect("framework should parse");
    let target = restore.target_for(&net6).expect("net6.0 target exists");
    assert_eq!(target.framework, net6);
}

#[test]
fn parse_project_declarations() {
    let raw = r#"
central_package_management = true

[[reference]]
name = "Serilog"

[[reference]]
name = "Polly"
version_override = "8.2.0"

[[reference]]
name = "System.Memory"
version = "4.5.5"
frameworks = ["net472"]

[[central]]
name = "serilog"
version = "3.1.1"

[[central]]
name = "StyleCop.Analyzers"
version = "1.1.118"
kind = "global-package-reference"
"#;

    let file = ProjectDeclarationsFile::from_toml_str(raw).expect("declarations should parse");
    assert!(file.central_package_management_enabled());

    let net8 = TargetFramework::parse("net8.0").expect("framework should parse");
    let refs = file.declared_references(&net8);
    assert_eq!(refs.len(), 2, "framework-scoped reference must be filtered out");
    assert_eq!(refs[0].requested_version, None);
    assert!(!refs[0].is_version_override);
    assert_eq!(refs[1].requested_version.as_deref(), Some("8.2.0"));
    assert!(refs[1].is_version_override);

    let net472 = TargetFramework::parse("net472").expect("framework should parse");
    assert_eq!(file.declared_references(&net472).len(), 3);

    assert_eq!(file.central_version_for("SERILOG").as_deref(), Some("3.1.1"));
    assert_eq!(
        file.central_version_for("stylecop.analyzers").as_deref(),
        Some("1.1.118")
    );
    assert_eq!(
        file.central_versions[1].kind,
        CentralPackageKind::GlobalPackageReference
    );
    assert_eq!(file.central_version_for("Missing"), None);
}

#[test]
fn duplicate_central_entries_are_rejected() {
    let raw = r#"
[[central]]
name = "Serilog"
version = "3.1.1"

[[central]]
name = "SERILOG"
version = "3.0.0"
"#;
    let err = ProjectDeclarationsFile::from_toml_str(raw).expect_err("duplicate must fail");
    assert!(
        err.to_string().contains("duplicate central version entry for 'SERILOG'"),
        "unexpected error: {err}"
    );
}
