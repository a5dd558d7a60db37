//! End-to-end pipeline tests over a realistic schema document.

use std::fs;
use std::path::{Path, PathBuf};

use enginegen::{Error, GeneratorConfig, Language, pipeline};
use serde_json::{Value, json};

fn sample_schema() -> Value {
    json!({
        "components": {
            "schemas": {
                "ObjectInterface": {
                    "type": "object",
                    "properties": {
                        "qHandle": {"type": "integer"},
                        "qGenericType": {"type": "string"}
                    }
                },
                "NxGrpType": {
                    "type": "string",
                    "oneOf": [
                        {"name": "GRP_NX_NONE", "x-engine-const": 0, "title": "None"},
                        {"name": "GRP_NX_COLLECTION", "x-engine-const": 2}
                    ]
                },
                "NxCell": {
                    "type": "object",
                    "description": "One cell of a data page.",
                    "properties": {
                        "qText": {"type": "string"},
                        "qElemNumber": {"type": "integer"}
                    }
                },
                "NxCells": {
                    "type": "array",
                    "items": {"$ref": "#/components/schemas/NxCell"}
                },
                "NxField": {
                    "type": "object",
                    "properties": {
                        "qType": {
                            "$ref": "#/components/schemas/NxGrpType",
                            "default": "GRP_NX_NONE"
                        },
                        "qHidden": {"type": "boolean"}
                    }
                }
            }
        },
        "x-engine-services": {
            "GenericObject": {
                "description": "Generic object service.",
                "methods": {
                    "GetLayout": {
                        "description": "Evaluates and returns the layout.",
                        "parameters": [],
                        "responses": [
                            {"name": "qLayout", "schema": {"$ref": "#/components/schemas/NxCell"}}
                        ]
                    },
                    "SelectValues": {
                        "parameters": [
                            {
                                "name": "qValues",
                                "type": "array",
                                "required": true,
                                "items": {"$ref": "#/components/schemas/NxCell"}
                            },
                            {"name": "qToggleMode", "type": "boolean"}
                        ],
                        "responses": []
                    },
                    "GetChild": {
                        "parameters": [],
                        "responses": [{
                            "name": "qReturn",
                            "schema": {"$ref": "#/components/schemas/ObjectInterface"},
                            "x-engine-service": "GenericObject"
                        }]
                    },
                    "GetProperties": {
                        "parameters": [],
                        "responses": [
                            {"name": "qProp", "schema": {"$ref": "#/components/schemas/NxCell"}},
                            {"name": "qInfo", "type": "boolean"}
                        ]
                    }
                }
            }
        }
    })
}

fn write_schema(dir: &Path, doc: &Value) -> PathBuf {
    let path = dir.join("engine-api.json");
    fs::write(&path, serde_json::to_string_pretty(doc).unwrap()).unwrap();
    path
}

fn quiet_config() -> GeneratorConfig {
    GeneratorConfig {
        use_descriptions: false,
        ..Default::default()
    }
}

#[test]
fn test_generates_both_languages_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path(), &sample_schema());

    let written = pipeline::run(
        &schema,
        None,
        &quiet_config(),
        &[Language::CSharp, Language::TypeScript],
    )
    .unwrap();
    assert!(!written.is_empty());

    let enums_cs = fs::read_to_string(dir.path().join("Enums.cs")).unwrap();
    assert!(enums_cs.contains("namespace EngineApi"));
    assert!(enums_cs.contains("    #region Enums"));
    assert!(enums_cs.contains("    public enum NxGrpType"));
    assert!(enums_cs.contains("        GRP_NX_NONE = 0,"));
    assert!(enums_cs.contains("        None = GRP_NX_NONE,"));
    assert!(enums_cs.contains("        GRP_NX_COLLECTION = 2,"));

    let interfaces_cs = fs::read_to_string(dir.path().join("Interfaces.cs")).unwrap();
    assert!(interfaces_cs.contains("    public interface IObjectInterface\n"));
    assert!(interfaces_cs.contains("        event EventHandler Changed;"));
    assert!(interfaces_cs.contains("    public interface IGenericObject : IObjectInterface"));
    assert!(interfaces_cs.contains("        Task<NxCell> GetLayout();"));
    assert!(interfaces_cs.contains("        Task<T> GetLayout<T>();"));
    // Root-typed response exposed as the annotated service interface.
    assert!(interfaces_cs.contains("        Task<IGenericObject> GetChild();"));
    // Optional parameter trails the required one with its zero default.
    assert!(interfaces_cs.contains(
        "        Task SelectValues(List<NxCell> qValues, bool qToggleMode = false);"
    ));
    // JSON-parameter overload pair for the method with parameters.
    assert!(interfaces_cs.contains("        Task SelectValues(JObject param);"));
    assert!(interfaces_cs.contains("        Task<T> SelectValues<T>(JObject param);"));
    // Two responses produce a wrapper return type.
    assert!(
        interfaces_cs.contains("        Task<GenericObjectGetPropertiesResponse> GetProperties();")
    );

    let wrapper_cs =
        fs::read_to_string(dir.path().join("GenericObjectGetPropertiesResponse.cs")).unwrap();
    assert!(wrapper_cs.contains("    public class GenericObjectGetPropertiesResponse"));
    assert!(wrapper_cs.contains("        public NxCell qProp { get; set; }"));
    assert!(wrapper_cs.contains("        public bool qInfo { get; set; }"));

    let field_cs = fs::read_to_string(dir.path().join("NxField.cs")).unwrap();
    assert!(field_cs.contains("        [DefaultValue(NxGrpType.GRP_NX_NONE)]"));
    assert!(
        field_cs.contains("        public NxGrpType qType { get; set; } = NxGrpType.GRP_NX_NONE;")
    );

    let cells_cs = fs::read_to_string(dir.path().join("NxCells.cs")).unwrap();
    assert!(cells_cs.contains("    public class NxCells : List<NxCell>"));

    let enums_ts = fs::read_to_string(dir.path().join("Enums.d.ts")).unwrap();
    assert!(enums_ts.contains("    //#region Enums"));
    assert!(enums_ts.contains(
        "    type NxGrpType = \"GRP_NX_NONE\" | \"None\" | \"GRP_NX_COLLECTION\";"
    ));

    let interfaces_ts = fs::read_to_string(dir.path().join("Interfaces.d.ts")).unwrap();
    assert!(interfaces_ts.contains("    interface IObjectInterface {"));
    assert!(interfaces_ts.contains("        changed(fn: () => void): void;"));
    assert!(interfaces_ts.contains("    interface IGenericObject extends IObjectInterface {"));
    assert!(interfaces_ts.contains("        getLayout(): Promise<NxCell>;"));
    assert!(interfaces_ts.contains("        getLayout<T>(): Promise<T>;"));
    assert!(interfaces_ts.contains("        getChild(): Promise<IGenericObject>;"));
    assert!(interfaces_ts.contains(
        "        selectValues(qValues: NxCell[], qToggleMode?: boolean): Promise<void>;"
    ));
    assert!(
        interfaces_ts.contains("        getProperties(): Promise<GenericObjectGetPropertiesResponse>;")
    );

    let cells_ts = fs::read_to_string(dir.path().join("NxCells.d.ts")).unwrap();
    assert!(cells_ts.contains("    interface NxCells extends Array<NxCell> {"));
}

#[test]
fn test_reruns_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path(), &sample_schema());
    let config = GeneratorConfig::default();
    let languages = [Language::CSharp, Language::TypeScript];

    let first = pipeline::run(&schema, None, &config, &languages).unwrap();
    let snapshots: Vec<String> = first
        .iter()
        .map(|p| fs::read_to_string(p).unwrap())
        .collect();

    let second = pipeline::run(&schema, None, &config, &languages).unwrap();
    assert_eq!(first, second);
    for (path, snapshot) in second.iter().zip(&snapshots) {
        assert_eq!(&fs::read_to_string(path).unwrap(), snapshot, "{}", path.display());
    }
}

#[test]
fn test_bundle_concatenates_and_removes_partials() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path(), &sample_schema());
    let config = GeneratorConfig {
        use_descriptions: false,
        bundle: true,
        ..Default::default()
    };

    let written = pipeline::run(
        &schema,
        None,
        &config,
        &[Language::CSharp, Language::TypeScript],
    )
    .unwrap();
    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["EngineApi.cs", "index.d.ts"]);
    assert!(!dir.path().join("Enums.cs").exists());
    assert!(!dir.path().join("Interfaces.d.ts").exists());
    assert!(!dir.path().join("NxCell.cs").exists());

    let bundle = fs::read_to_string(dir.path().join("EngineApi.cs")).unwrap();
    assert!(bundle.starts_with("// <auto-generated>"));
    assert!(bundle.contains("public enum NxGrpType"));
    assert!(bundle.contains("public interface IGenericObject : IObjectInterface"));
    assert!(bundle.contains("public class NxCell"));

    let index = fs::read_to_string(dir.path().join("index.d.ts")).unwrap();
    assert!(index.starts_with("// <auto-generated>"));
    assert!(index.contains("type NxGrpType = "));
    assert!(index.contains("interface NxCell {"));
}

#[test]
fn test_conventional_overlay_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path(), &sample_schema());

    // Sibling overlay picked up by naming convention: deprecates GetLayout
    // and re-declares its response, which the merge must collapse back to
    // a single entry instead of synthesizing a wrapper.
    let overlay = json!({
        "x-engine-services": {
            "GenericObject": {
                "methods": {
                    "GetLayout": {
                        "deprecated": true,
                        "x-engine-deprecation-description": "Use GetFullLayout instead.",
                        "responses": [
                            {"name": "qLayout", "description": "The evaluated layout."}
                        ]
                    }
                }
            }
        }
    });
    fs::write(
        dir.path().join("engine-api_change.json"),
        serde_json::to_string(&overlay).unwrap(),
    )
    .unwrap();

    pipeline::run(&schema, None, &quiet_config(), &[Language::CSharp]).unwrap();

    let interfaces_cs = fs::read_to_string(dir.path().join("Interfaces.cs")).unwrap();
    assert!(interfaces_cs.contains("        [ObsoleteAttribute(\"Use GetFullLayout instead.\")]"));
    assert!(interfaces_cs.contains("        Task<NxCell> GetLayout();"));
    assert!(!dir.path().join("GenericObjectGetLayoutResponse.cs").exists());
}

#[test]
fn test_failed_emission_run_leaves_other_run_intact() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path(), &sample_schema());

    // A plain file occupies the C# output path, so that run cannot even
    // create its directory; the TypeScript run must still complete.
    let blocked = dir.path().join("cs");
    fs::write(&blocked, "occupied").unwrap();
    let ts_out = dir.path().join("ts");
    let config = GeneratorConfig {
        use_descriptions: false,
        output_csharp: Some(blocked.clone()),
        output_typescript: Some(ts_out.clone()),
        ..Default::default()
    };

    let err = pipeline::run(
        &schema,
        None,
        &config,
        &[Language::CSharp, Language::TypeScript],
    )
    .unwrap_err();
    assert!(matches!(err, Error::Emit(_)));

    assert!(ts_out.join("Enums.d.ts").exists());
    assert!(ts_out.join("Interfaces.d.ts").exists());
    assert!(ts_out.join("NxCell.d.ts").exists());
    assert!(blocked.is_file(), "failed run must not disturb the blocking path");
}

#[test]
fn test_typescript_only_run_writes_no_csharp() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("ts");
    let schema = write_schema(dir.path(), &sample_schema());
    let config = GeneratorConfig {
        use_descriptions: false,
        output_typescript: Some(out.clone()),
        ..Default::default()
    };

    let written = pipeline::run(&schema, None, &config, &[Language::TypeScript]).unwrap();
    assert!(written.iter().all(|p| p.starts_with(&out)));
    assert!(!dir.path().join("Enums.cs").exists());
    assert!(out.join("Enums.d.ts").exists());
}
