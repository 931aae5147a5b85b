#![allow(dead_code)]

pub mod mocks;

use std::fs;
use std::path::Path;

/// Write a prompt tree with simple templates for both patterns and all providers.
pub fn write_prompt_tree(root: &Path) {
    let shortcut = "$few_shot_examples\nA=$A_label p=$p_label B=$B_label r=$r_label C=$C_label\nschema=$output_schema";
    let subclass = "$few_shot_examples\nA=$A_label p=$p_label B=$B_label C=$C_label\nschema=$output_schema";

    for (pattern, body) in [("1_shortcut", shortcut), ("2_subclass", subclass)] {
        for provider in ["openai", "ollama", "tgi"] {
            for technique in ["baseline", "few_shot"] {
                let dir = root.join(pattern).join(provider);
                fs::create_dir_all(&dir).unwrap();
                fs::write(
                    dir.join(format!("{technique}.txt")),
                    format!("[{technique}]{body}"),
                )
                .unwrap();
            }
        }
    }

    fs::write(
        root.join("1_shortcut/output_schema.json"),
        r#"{"type":"object","required":["property_name","explanation"]}"#,
    )
    .unwrap();
    fs::write(
        root.join("2_subclass/output_schema.json"),
        r#"{"type":"object","required":["class_name","explanation"]}"#,
    )
    .unwrap();
}
