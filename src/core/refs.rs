//! Value helpers shared by checks
//!
//! Templates write many fields as "string or list of strings", and refer to
//! other resources through `Ref` / `Fn::GetAtt` intrinsics.

use serde_json::Value;

/// Render a value as a string: strings verbatim, anything else (intrinsic
/// functions, numbers) as compact JSON
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Coerce a "string or list" field into a list
///
/// A scalar becomes a one-element list; an array keeps its order.
pub fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(render).collect(),
        other => vec![render(other)],
    }
}

/// Logical id of a security group referenced by `{"Ref": id}` or
/// `{"Fn::GetAtt": [id, "GroupId"]}`
///
/// Literal group ids, imports and other intrinsics reference nothing inside
/// the template and yield `None`.
pub fn group_ref(value: &Value) -> Option<&str> {
    if let Some(id) = value.get("Ref").and_then(Value::as_str) {
        return Some(id);
    }

    match value.get("Fn::GetAtt")? {
        Value::Array(parts) => match parts.as_slice() {
            [Value::String(id), Value::String(attribute)] if attribute == "GroupId" => {
                Some(id.as_str())
            }
            _ => None,
        },
        Value::String(dotted) => match dotted.split_once('.') {
            Some((id, "GroupId")) => Some(id),
            _ => None,
        },
        _ => None,
    }
}

const NO_VALUE: &str = "AWS::NoValue";

fn is_no_value(value: &Value) -> bool {
    value.get("Ref").and_then(Value::as_str) == Some(NO_VALUE)
}

/// Both branches of `{"Fn::If": [condition, when_true, when_false]}`
fn condition_branches(value: &Value) -> Option<[&Value; 2]> {
    match value.get("Fn::If")?.as_array()?.as_slice() {
        [_, when_true, when_false] => Some([when_true, when_false]),
        _ => None,
    }
}

/// Every value a property may take once conditions are decided
///
/// `Fn::If` contributes both branches, `AWS::NoValue` contributes nothing,
/// anything else is itself.
pub fn alternatives(value: &Value) -> Vec<&Value> {
    match condition_branches(value) {
        Some(branches) => branches.into_iter().flat_map(alternatives).collect(),
        None if is_no_value(value) => Vec::new(),
        None => vec![value],
    }
}

/// Items of a list-valued property, across all condition branches
///
/// Conditional items and conditional lists are expanded with
/// [`alternatives`]. Returns `None` when a branch is not a list.
pub fn list_items(value: &Value) -> Option<Vec<&Value>> {
    let mut items = Vec::new();
    for list in alternatives(value) {
        items.extend(list.as_array()?.iter().flat_map(alternatives));
    }
    Some(items)
}

/// Group references of every item of a list
///
/// A whole-list `Ref` names a list parameter; its groups live outside the
/// template. Returns `None` for shapes that are not lists.
pub fn group_refs(value: &Value) -> Option<Vec<String>> {
    if value.get("Ref").is_some() {
        return Some(Vec::new());
    }
    let items = list_items(value)?;
    Some(
        items
            .into_iter()
            .filter_map(group_ref)
            .map(str::to_string)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_list() {
        assert_eq!(string_list(&json!("s3:GetObject")), vec!["s3:GetObject"]);
        assert_eq!(string_list(&json!(["a", "b"])), vec!["a", "b"]);
        assert!(string_list(&json!([])).is_empty());
    }

    #[test]
    fn test_string_list_renders_intrinsics() {
        let value = json!([{"Fn::GetAtt": ["Bucket", "Arn"]}, "plain"]);
        assert_eq!(
            string_list(&value),
            vec![r#"{"Fn::GetAtt":["Bucket","Arn"]}"#, "plain"]
        );
    }

    #[test]
    fn test_group_ref_forms() {
        assert_eq!(group_ref(&json!({"Ref": "SgWeb"})), Some("SgWeb"));
        assert_eq!(
            group_ref(&json!({"Fn::GetAtt": ["SgWeb", "GroupId"]})),
            Some("SgWeb")
        );
        assert_eq!(group_ref(&json!({"Fn::GetAtt": "SgWeb.GroupId"})), Some("SgWeb"));
        assert_eq!(group_ref(&json!({"Fn::GetAtt": ["SgWeb", "VpcId"]})), None);
        assert_eq!(group_ref(&json!("sg-0123456789")), None);
        assert_eq!(group_ref(&json!({"Fn::ImportValue": "shared-sg"})), None);
    }

    #[test]
    fn test_group_refs() {
        let value = json!([{"Ref": "A"}, "sg-123", {"Fn::GetAtt": ["B", "GroupId"]}]);
        assert_eq!(group_refs(&value), Some(vec!["A".to_string(), "B".to_string()]));
        assert_eq!(group_refs(&json!({"Ref": "ListParam"})), Some(Vec::new()));
    }

    #[test]
    fn test_group_refs_rejects_non_lists() {
        assert_eq!(group_refs(&json!("sg-123")), None);
        assert_eq!(group_refs(&json!({"Fn::Split": [",", "sg-1,sg-2"]})), None);
    }

    #[test]
    fn test_conditional_lists() {
        let value = json!({"Fn::If": [
            "IsProd",
            [{"Ref": "SgProd"}, {"Fn::If": ["HasDebug", {"Ref": "SgDebug"}, {"Ref": "AWS::NoValue"}]}],
            {"Ref": "AWS::NoValue"}
        ]});
        assert_eq!(
            group_refs(&value),
            Some(vec!["SgProd".to_string(), "SgDebug".to_string()])
        );

        let mixed = json!({"Fn::If": ["IsProd", [{"Ref": "A"}], "sg-literal"]});
        assert_eq!(list_items(&mixed), None);
        assert_eq!(list_items(&json!({"Ref": "AWS::NoValue"})), Some(Vec::new()));
    }

    #[test]
    fn test_alternatives() {
        let value = json!({"Fn::If": ["C", "a", {"Fn::If": ["D", "b", {"Ref": "AWS::NoValue"}]}]});
        assert_eq!(alternatives(&value), vec![&json!("a"), &json!("b")]);
        assert_eq!(alternatives(&json!("plain")), vec![&json!("plain")]);
    }
}
