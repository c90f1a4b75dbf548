//! Template flattening
//!
//! A template is a JSON document with up to five top-level sections. Each
//! entry of each section becomes one [`TemplateObject`], tagged with its
//! section and logical id. Objects are built once and handed to every check
//! by shared reference.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Top-level template section an object came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Parameter,
    Mapping,
    Condition,
    Resource,
    Output,
}

impl Section {
    /// Sections in emission order, paired with their template key
    pub const ALL: [(Section, &'static str); 5] = [
        (Section::Parameter, "Parameters"),
        (Section::Mapping, "Mappings"),
        (Section::Condition, "Conditions"),
        (Section::Resource, "Resources"),
        (Section::Output, "Outputs"),
    ];
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Parameter => "Parameter",
            Section::Mapping => "Mapping",
            Section::Condition => "Condition",
            Section::Resource => "Resource",
            Section::Output => "Output",
        };
        f.write_str(name)
    }
}

/// One flattened entry of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateObject {
    /// Key of the entry inside its section
    pub logical_id: String,

    /// Section the entry came from
    pub section: Section,

    /// `Type` of a resource; `None` outside the Resources section or when
    /// the resource carries no string `Type`
    pub resource_type: Option<String>,

    /// The entry's body as written in the template
    pub body: Value,
}

impl TemplateObject {
    /// True for Resource-section objects
    pub fn is_resource(&self) -> bool {
        self.section == Section::Resource
    }

    /// True for Resource-section objects of the given type
    pub fn is_resource_of(&self, resource_type: &str) -> bool {
        self.is_resource() && self.resource_type.as_deref() == Some(resource_type)
    }

    /// The resource's `Properties` mapping, if present
    pub fn properties(&self) -> Option<&Value> {
        self.body.get("Properties")
    }

    /// A single property by name
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties().and_then(|properties| properties.get(name))
    }
}

/// Flatten a template into its ordered objects
///
/// Sections are emitted Parameters, Mappings, Conditions, Resources,
/// Outputs; entries keep their order inside a section. Missing or
/// non-object sections contribute nothing. Entries are not validated.
///
/// # Examples
/// ```
/// use cfn_check::{flatten, Section};
/// use serde_json::json;
///
/// let objects = flatten(&json!({
///     "Outputs": {"Url": {"Value": "x"}},
///     "Resources": {"Bucket": {"Type": "AWS::S3::Bucket"}}
/// }));
/// assert_eq!(objects[0].section, Section::Resource);
/// assert_eq!(objects[1].logical_id, "Url");
/// ```
pub fn flatten(template: &Value) -> Vec<TemplateObject> {
    let mut objects = Vec::new();

    for (section, key) in Section::ALL {
        let Some(entries) = template.get(key).and_then(Value::as_object) else {
            continue;
        };

        for (logical_id, body) in entries {
            let resource_type = match section {
                Section::Resource => body
                    .get("Type")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            };

            objects.push(TemplateObject {
                logical_id: logical_id.clone(),
                section,
                resource_type,
                body: body.clone(),
            });
        }
    }

    objects
}
