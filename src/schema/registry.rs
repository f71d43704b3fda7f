//! The seven payload contracts of the Toast Cloud SMS API, as rule-tree data.
//!
//! Field lists, enums, and date patterns follow the API reference for v2.2.
//! Patterns are unanchored searches, matching Draft-07 `pattern` semantics.

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::rules::{Clause, ItemRule, Rule, Schema, ValueKind};

pub const RECIPIENT_LIST_MIN: usize = 1;
pub const RECIPIENT_LIST_MAX: usize = 1000;

/// `YYYY-MM-DD HH:MM:SS`, used by the result-lookup date range fields.
static DATE_TIME_SECONDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}")
        .expect("date-time pattern compiles")
});

/// `YYYY-MM-DD HH:MM`, used by the reserved-send `requestDate` field.
static DATE_TIME_MINUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}").expect("date-time pattern compiles")
});

const SEND_TYPES: &[&str] = &["sms", "mms"];
const YES_NO: &[&str] = &["Y", "N"];
const RESULT_CODES: &[&str] = &["MTR1", "MTR2"];
const SUB_RESULT_CODES: &[&str] = &["MTR_1", "MTR_2", "MTR_3"];
const TEMPLATE_SEND_TYPES: &[&str] = &["0", "1"];

fn string() -> Vec<Rule> {
    vec![Rule::Type(ValueKind::String)]
}

fn integer() -> Vec<Rule> {
    vec![Rule::Type(ValueKind::Integer)]
}

fn string_enum(allowed: &'static [&'static str]) -> Vec<Rule> {
    vec![Rule::Type(ValueKind::String), Rule::Enum(allowed)]
}

fn date_time(pattern: &'static LazyLock<Regex>) -> Vec<Rule> {
    vec![Rule::Type(ValueKind::String), Rule::Pattern(pattern)]
}

fn array_of(kind: ValueKind) -> Vec<Rule> {
    vec![Rule::Type(ValueKind::Array), Rule::Items(ItemRule::Kind(kind))]
}

/// The title/body requirement of the send schemas: MMS needs both, SMS only
/// a body. Kept separate from the `templateId` clause on purpose; the API
/// contract requires both to hold simultaneously.
fn title_body_clause() -> Clause {
    Clause::If {
        property: "sendType",
        equals: "mms",
        then: Box::new(Clause::Required(&["title", "body"])),
        otherwise: Box::new(Clause::Required(&["body"])),
    }
}

/// One entry of a bulk-send recipient list.
pub fn recipient() -> Schema {
    Schema::new("recipient")
        .property("recipientNo", string())
        .property("countryCode", string())
        .property("internationalRecipientNo", string())
        .property("templateParameter", vec![Rule::Type(ValueKind::Object)])
        .property("recipientGroupingKey", string())
        .required(&["recipientNo"])
}

/// Sent-result lookup parameters. Read path: unknown keys are tolerated.
pub fn query() -> Schema {
    Schema::new("query")
        .property("sendType", string_enum(SEND_TYPES))
        .property("requestId", string())
        .property("startRequestDate", date_time(&DATE_TIME_SECONDS))
        .property("endRequestDate", date_time(&DATE_TIME_SECONDS))
        .property("startResultDate", date_time(&DATE_TIME_SECONDS))
        .property("endResultDate", date_time(&DATE_TIME_SECONDS))
        .property("sendNo", string())
        .property("recipientNo", string())
        .property("templateId", string())
        .property("msgStatus", string())
        .property("resultCode", string_enum(RESULT_CODES))
        .property("subResultCode", string_enum(SUB_RESULT_CODES))
        .property("senderGroupingKey", string())
        .property("recipientGroupingKey", string())
        .property("pageNum", integer())
        .property("pageSize", integer())
        .required(&["sendType"])
        .clause(Clause::AnyOf(vec![
            Clause::Required(&["requestId"]),
            Clause::Required(&["startRequestDate", "endRequestDate"]),
        ]))
}

/// Tag-expression send payload.
pub fn tag_send() -> Schema {
    Schema::new("tag-send")
        .property("sendType", string_enum(SEND_TYPES))
        .property("sendNo", string())
        .property("templateId", string())
        .property("templateParameter", vec![Rule::Type(ValueKind::Object)])
        .property("title", string())
        .property("body", string())
        .property("tagExpression", array_of(ValueKind::String))
        .property("attachFileIdList", array_of(ValueKind::Integer))
        .property("userId", string())
        .property("requestDate", date_time(&DATE_TIME_MINUTES))
        .property("adYn", string_enum(YES_NO))
        .property("autoSendYn", string_enum(YES_NO))
        .required(&["sendNo", "tagExpression", "sendType"])
        .clause(title_body_clause())
        .clause(Clause::Required(&["templateId"]))
        .deny_additional_properties()
}

/// Bulk-send payload with an explicit recipient list.
pub fn basic_send() -> Schema {
    Schema::new("basic-send")
        .property("sendType", string_enum(SEND_TYPES))
        .property("templateId", string())
        .property("title", string())
        .property("body", string())
        .property("sendNo", string())
        .property("requestDate", date_time(&DATE_TIME_MINUTES))
        .property("senderGroupingKey", string())
        .property("attachFileIdList", array_of(ValueKind::Integer))
        .property(
            "recipientList",
            vec![
                Rule::Type(ValueKind::Array),
                Rule::ArrayBounds {
                    min: RECIPIENT_LIST_MIN,
                    max: RECIPIENT_LIST_MAX,
                },
                Rule::Items(ItemRule::Schema(Box::new(recipient()))),
            ],
        )
        .property("userId", string())
        .required(&["sendNo", "recipientList", "sendType"])
        .clause(title_body_clause())
        .clause(Clause::Required(&["templateId"]))
        .deny_additional_properties()
}

/// Attachment upload payload.
pub fn upload() -> Schema {
    Schema::new("upload")
        .property("fileName", string())
        .property("createUser", string())
        .property("fileBody", array_of(ValueKind::String))
        .required(&["fileName", "createUser", "fileBody"])
        .deny_additional_properties()
}

/// Template category payload.
pub fn category() -> Schema {
    Schema::new("category")
        .property("categoryParentId", integer())
        .property("categoryName", string())
        .property("categoryDesc", string())
        .property("useYn", string_enum(YES_NO))
        .property("createUser", string())
        .property("updateUser", string())
        .required(&["categoryName", "useYn"])
        .deny_additional_properties()
}

/// Message template payload. `sendType` here is `'0'` (SMS) or `'1'` (MMS);
/// MMS templates additionally need a title.
pub fn template() -> Schema {
    Schema::new("template")
        .property("categoryId", integer())
        .property("templateId", string())
        .property("templateName", string())
        .property("templateDesc", string())
        .property("sendNo", string())
        .property("sendType", string_enum(TEMPLATE_SEND_TYPES))
        .property("title", string())
        .property("body", string())
        .property("useYn", string_enum(YES_NO))
        .property("attachFileIdList", array_of(ValueKind::Integer))
        .required(&[
            "categoryId",
            "templateId",
            "templateName",
            "sendNo",
            "sendType",
            "body",
            "useYn",
        ])
        .clause(Clause::If {
            property: "sendType",
            equals: "1",
            then: Box::new(Clause::Required(&["title"])),
            otherwise: Box::new(Clause::Required(&[])),
        })
        .deny_additional_properties()
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn paths(err: &crate::schema::ValidationError) -> Vec<String> {
        err.violations()
            .iter()
            .map(|violation| violation.path.clone())
            .collect()
    }

    fn basic_payload() -> Value {
        json!({
            "sendType": "sms",
            "sendNo": "15446859",
            "body": "hello",
            "templateId": "TemplateId",
            "recipientList": [{ "recipientNo": "01012345678" }]
        })
    }

    #[test]
    fn recipient_requires_recipient_no() {
        assert!(recipient().validate(&json!({ "recipientNo": "0101234" })).is_ok());

        let err = recipient()
            .validate(&json!({ "countryCode": "82" }))
            .unwrap_err();
        assert_eq!(paths(&err), vec!["recipientNo"]);
    }

    #[test]
    fn recipient_tolerates_unknown_keys() {
        // The recipient sub-schema does not set additionalProperties.
        assert!(
            recipient()
                .validate(&json!({ "recipientNo": "0101234", "note": "vip" }))
                .is_ok()
        );
    }

    #[test]
    fn query_requires_request_id_or_date_range() {
        let schema = query();
        assert!(schema.validate(&json!({ "sendType": "sms" })).is_err());
        assert!(
            schema
                .validate(&json!({ "sendType": "sms", "requestId": "2018..." }))
                .is_ok()
        );
        assert!(
            schema
                .validate(&json!({
                    "sendType": "mms",
                    "startRequestDate": "2018-01-01 00:00:00",
                    "endRequestDate": "2018-01-31 23:59:59"
                }))
                .is_ok()
        );
        assert!(
            schema
                .validate(&json!({
                    "sendType": "mms",
                    "startRequestDate": "2018-01-01 00:00:00"
                }))
                .is_err()
        );
    }

    #[test]
    fn query_checks_date_pattern_and_enums() {
        let schema = query();
        let err = schema
            .validate(&json!({
                "sendType": "fax",
                "requestId": "r",
                "startRequestDate": "2018/01/01",
                "resultCode": "MTR9",
                "pageNum": "1"
            }))
            .unwrap_err();
        let paths = paths(&err);
        assert!(paths.contains(&"sendType".to_owned()));
        assert!(paths.contains(&"startRequestDate".to_owned()));
        assert!(paths.contains(&"resultCode".to_owned()));
        assert!(paths.contains(&"pageNum".to_owned()));
    }

    #[test]
    fn basic_send_minimal_payload_passes() {
        assert!(basic_send().validate(&basic_payload()).is_ok());
    }

    #[test]
    fn basic_send_missing_any_required_field_names_it() {
        for field in ["sendNo", "recipientList", "sendType"] {
            let mut payload = basic_payload();
            payload.as_object_mut().unwrap().remove(field);
            let err = basic_send().validate(&payload).unwrap_err();
            assert!(
                paths(&err).contains(&field.to_owned()),
                "expected {field} in {err}"
            );
        }
    }

    #[test]
    fn basic_send_mms_requires_title() {
        let mut payload = basic_payload();
        payload["sendType"] = json!("mms");
        assert!(basic_send().validate(&payload).is_err());

        payload["title"] = json!("subject");
        assert!(basic_send().validate(&payload).is_ok());
    }

    #[test]
    fn basic_send_template_id_is_required_regardless_of_send_type() {
        for send_type in ["sms", "mms"] {
            let mut payload = basic_payload();
            payload["sendType"] = json!(send_type);
            payload["title"] = json!("subject");
            payload.as_object_mut().unwrap().remove("templateId");
            let err = basic_send().validate(&payload).unwrap_err();
            assert!(
                paths(&err).contains(&"templateId".to_owned()),
                "expected templateId for sendType={send_type}: {err}"
            );
        }
    }

    #[test]
    fn basic_send_rejects_unknown_properties() {
        let mut payload = basic_payload();
        payload["unexpected"] = json!("x");
        let err = basic_send().validate(&payload).unwrap_err();
        assert_eq!(paths(&err), vec!["unexpected"]);
    }

    #[test]
    fn recipient_list_bounds_are_enforced() {
        let schema = basic_send();
        for (count, ok) in [(0, false), (1, true), (1000, true), (1001, false)] {
            let mut payload = basic_payload();
            payload["recipientList"] =
                json!(vec![json!({ "recipientNo": "01012345678" }); count]);
            assert_eq!(
                schema.validate(&payload).is_ok(),
                ok,
                "recipient count {count}"
            );
        }
    }

    #[test]
    fn recipient_list_items_are_validated_with_indexed_paths() {
        let mut payload = basic_payload();
        payload["recipientList"] = json!([
            { "recipientNo": "01012345678" },
            { "countryCode": "82" }
        ]);
        let err = basic_send().validate(&payload).unwrap_err();
        assert_eq!(paths(&err), vec!["recipientList[1].recipientNo"]);
    }

    #[test]
    fn tag_send_mirrors_the_send_conditionals() {
        let schema = tag_send();
        let payload = json!({
            "sendType": "sms",
            "sendNo": "15446859",
            "body": "hello",
            "templateId": "TemplateId",
            "tagExpression": ["tag1", "tag2"]
        });
        assert!(schema.validate(&payload).is_ok());

        let mut mms = payload.clone();
        mms["sendType"] = json!("mms");
        assert!(schema.validate(&mms).is_err());
        mms["title"] = json!("subject");
        assert!(schema.validate(&mms).is_ok());

        let mut without_template = payload.clone();
        without_template.as_object_mut().unwrap().remove("templateId");
        assert!(schema.validate(&without_template).is_err());
    }

    #[test]
    fn tag_send_checks_tag_expression_items_and_flags() {
        let schema = tag_send();
        let err = schema
            .validate(&json!({
                "sendType": "sms",
                "sendNo": "15446859",
                "body": "hello",
                "templateId": "TemplateId",
                "tagExpression": ["tag1", 2],
                "adYn": "maybe",
                "requestDate": "2018-08-10"
            }))
            .unwrap_err();
        let paths = paths(&err);
        assert!(paths.contains(&"tagExpression[1]".to_owned()));
        assert!(paths.contains(&"adYn".to_owned()));
        assert!(paths.contains(&"requestDate".to_owned()));
    }

    #[test]
    fn upload_requires_all_fields_and_rejects_extras() {
        let schema = upload();
        let payload = json!({
            "fileName": "attach.jpg",
            "createUser": "admin",
            "fileBody": ["base64-chunk"]
        });
        assert!(schema.validate(&payload).is_ok());

        let err = schema.validate(&json!({ "fileName": "attach.jpg" })).unwrap_err();
        let paths = paths(&err);
        assert!(paths.contains(&"createUser".to_owned()));
        assert!(paths.contains(&"fileBody".to_owned()));

        let mut extra = payload.clone();
        extra["updateUser"] = json!("admin");
        assert!(schema.validate(&extra).is_err());
    }

    #[test]
    fn category_contract() {
        let schema = category();
        assert!(
            schema
                .validate(&json!({ "categoryName": "promos", "useYn": "Y" }))
                .is_ok()
        );
        assert!(
            schema
                .validate(&json!({
                    "categoryName": "promos",
                    "useYn": "Y",
                    "categoryParentId": 1,
                    "categoryDesc": "promotional messages",
                    "createUser": "admin"
                }))
                .is_ok()
        );
        assert!(schema.validate(&json!({ "categoryName": "promos" })).is_err());
        assert!(
            schema
                .validate(&json!({ "categoryName": "promos", "useYn": "yes" }))
                .is_err()
        );
        assert!(
            schema
                .validate(&json!({
                    "categoryName": "promos",
                    "useYn": "Y",
                    "categoryParentId": "1"
                }))
                .is_err()
        );
    }

    #[test]
    fn template_title_is_conditional_on_send_type() {
        let schema = template();
        let base = json!({
            "categoryId": 0,
            "templateId": "TemplateId",
            "templateName": "welcome",
            "sendNo": "15446859",
            "body": "hello",
            "useYn": "Y"
        });

        let mut sms = base.clone();
        sms["sendType"] = json!("0");
        assert!(schema.validate(&sms).is_ok());

        let mut mms = base.clone();
        mms["sendType"] = json!("1");
        assert!(schema.validate(&mms).is_err());
        mms["title"] = json!("subject");
        assert!(schema.validate(&mms).is_ok());

        let mut bad_type = base;
        bad_type["sendType"] = json!("2");
        assert!(schema.validate(&bad_type).is_err());
    }
}
