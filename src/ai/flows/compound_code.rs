// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Multi-file code generation for a described feature.

use crate::ai::flow::{run_structured, schema, StructuredFlow};
use crate::ai::prompt::PromptBuilder;
use crate::ai::{Generated, GenerativeModel, Part};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A file the caller wants generated.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FileRequest {
    #[validate(length(min = 1))]
    pub name: String,
    /// Purpose, e.g. "component" or "service"
    #[serde(rename = "type")]
    pub file_type: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CompoundCodeInput {
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub technology: String,
    #[validate(length(min = 1), nested)]
    pub files: Vec<FileRequest>,
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct CodeFile {
    #[validate(length(min = 1))]
    pub file_name: String,
    pub file_path: String,
    pub content: String,
    pub language: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct CompoundCode {
    #[validate(nested)]
    pub files: Vec<CodeFile>,
    pub setup_instructions: String,
    pub dependencies: Vec<String>,
}

pub struct GenerateCompoundCode;

impl StructuredFlow for GenerateCompoundCode {
    const NAME: &'static str = "generate_compound_code";
    type Input = CompoundCodeInput;
    type Output = CompoundCode;

    fn prompt(input: &CompoundCodeInput) -> Result<Vec<Part>, AppError> {
        let mut text = String::from(
            "You are an expert software architect and developer. Your task is to generate \
             multiple related code files/components that work together to implement a complete \
             feature or module.\n\n",
        );
        // Writing to a String cannot fail
        let _ = write!(
            text,
            "**Project Description:**\n{}\n\n**Technology Stack:**\n{}\n\n**Files to Generate:**\n",
            input.description, input.technology
        );
        for file in &input.files {
            let _ = write!(
                text,
                "- **File Name:** {}\n- **Type:** {}\n- **Description:** {}\n",
                file.name, file.file_type, file.description
            );
        }
        if let Some(deps) = input.dependencies.as_ref().filter(|d| !d.is_empty()) {
            text.push_str("\n**Dependencies to Use:**\n");
            for dep in deps {
                let _ = writeln!(text, "- {}", dep);
            }
        }
        text.push_str(
            "\n**Instructions:**\n\
             1. Generate complete, production-ready code for each file specified.\n\
             2. Ensure all files work together seamlessly - they should import/export from each \
             other correctly.\n\
             3. Include proper error handling, type definitions (if using TypeScript), and best \
             practices.\n\
             4. Add comments where necessary to explain complex logic.\n\
             5. Make sure imports and exports are correct and all dependencies are properly used.\n\
             6. Each file should be self-contained but integrate well with others.\n\
             7. Include proper file structure and paths.\n\
             8. Provide setup instructions for integrating these files.\n\
             9. List all dependencies that need to be installed.\n\n\
             **Output Format:**\n\
             - For each file, provide: fileName, filePath, content (complete code), language, \
             and description.\n\
             - Provide clear setup instructions.\n\
             - List all required dependencies.\n\n\
             **CRITICAL:** Generate complete, working code. Do not leave placeholders unless \
             absolutely necessary.",
        );
        Ok(PromptBuilder::new().text(text).build())
    }

    fn response_schema() -> serde_json::Value {
        schema::object(
            json!({
                "files": schema::array(
                    schema::object(
                        json!({
                            "fileName": schema::string("The name of the file."),
                            "filePath": schema::string("The relative path where this file should be placed."),
                            "content": schema::string("The complete code content for this file."),
                            "language": schema::string("The programming language."),
                            "description": schema::string("A brief description of what this file does."),
                        }),
                        &["fileName", "filePath", "content", "language", "description"],
                    ),
                    "An array of generated code files.",
                ),
                "setupInstructions": schema::string("Instructions for setting up and integrating these files."),
                "dependencies": schema::array(json!({ "type": "STRING" }), "Dependencies that need to be installed."),
            }),
            &["files", "setupInstructions", "dependencies"],
        )
    }
}

pub async fn generate_compound_code(
    model: &dyn GenerativeModel,
    input: &CompoundCodeInput,
) -> Result<Generated<CompoundCode>, AppError> {
    run_structured::<GenerateCompoundCode>(model, input).await
}
