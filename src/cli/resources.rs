//! Built-in resource descriptors.

use crate::project::{Projector, field};

use super::registry::ResourceDescriptor;

const NAME_KEYS: &[&str] = &["company-name", "name"];
const USER_KEYS: &[&str] = &["name", "email-address"];

pub(super) fn all() -> Vec<ResourceDescriptor> {
    vec![
        brokers(),
        broker_commitments(),
        broker_memberships(),
        truckers(),
        users(),
        projects(),
        customers(),
    ]
}

fn brokers() -> ResourceDescriptor {
    ResourceDescriptor::builder()
        .name("brokers")
        .summary("Brokerage organizations")
        .path("/v1/brokers")
        .resource_type("brokers")
        .list_fields(&["company-name", "is-active"])
        .filters(&[
            "company-name",
            "is-active",
            "is-default",
            "sub-domain",
            "trailer-classification",
            "quickbooks-enabled",
        ])
        .list(
            Projector::new()
                .field("ID", field::id())
                .field("Company", field::string("company-name"))
                .field("Active", field::boolean("is-active")),
        )
        .detail(
            Projector::new()
                .field("ID", field::id())
                .field("Company Name", field::string("company-name"))
                .field("Sub Domain", field::string("sub-domain"))
                .field("Active", field::boolean("is-active"))
                .field("Default", field::boolean("is-default"))
                .field("Created", field::timestamp("created-at")),
        )
        .build()
}

fn broker_commitments() -> ResourceDescriptor {
    ResourceDescriptor::builder()
        .name("broker-commitments")
        .summary("Capacity commitments between brokers and truckers")
        .path("/v1/broker-commitments")
        .resource_type("broker-commitments")
        .list_fields(&["status", "label", "buyer", "seller", "truck-scope"])
        .list_include(&["buyer", "seller"])
        .show_include(&["buyer", "seller"])
        .related_fields(&[("brokers", &["company-name"]), ("truckers", &["company-name"])])
        .filters(&[
            "status",
            "broker",
            "broker_id",
            "trucker",
            "trucker_id",
            "created-at-min",
            "created-at-max",
            "updated-at-min",
            "updated-at-max",
        ])
        .list(
            Projector::new()
                .field("ID", field::id())
                .field("Status", field::string("status"))
                .field("BuyerType", field::relationship_type("buyer"))
                .field("BuyerID", field::relationship_id("buyer"))
                .field("BuyerName", field::related_string("buyer", NAME_KEYS))
                .field("Seller", field::related_or_id("seller", NAME_KEYS))
                .field("Label", field::string("label")),
        )
        .detail(
            Projector::new()
                .field("ID", field::id())
                .field("Status", field::string("status"))
                .field("Label", field::string("label"))
                .field("Buyer", field::polymorphic("buyer", "/"))
                .field("Buyer Name", field::related_string("buyer", NAME_KEYS))
                .field("Seller", field::polymorphic("seller", "/"))
                .field("Seller Name", field::related_string("seller", NAME_KEYS))
                .field("Truck Scope", field::relationship_id("truck-scope"))
                .field("Notes", field::string("notes")),
        )
        .build()
}

fn broker_memberships() -> ResourceDescriptor {
    ResourceDescriptor::builder()
        .name("broker-memberships")
        .summary("Users' roles within brokers")
        .path("/v1/broker-memberships")
        .resource_type("broker-memberships")
        .list_include(&["user", "organization", "broker"])
        .show_include(&["user", "organization", "broker", "project-office"])
        .related_fields(&[
            ("users", &["name", "email-address", "mobile-number"]),
            ("brokers", &["company-name"]),
            ("project-offices", &["name"]),
        ])
        .filters(&["broker", "organization", "user", "kind", "q", "project_office"])
        .list(
            Projector::new()
                .field("ID", field::id())
                .field("User", field::related_or_id("user", USER_KEYS))
                .field("Broker", field::first_non_empty(vec![
                    field::related_string("broker", NAME_KEYS),
                    field::related_string("organization", NAME_KEYS),
                    field::relationship_id("broker"),
                ]))
                .field("Kind", field::string("kind"))
                .field("Admin", field::boolean("is-admin")),
        )
        .detail(
            Projector::new()
                .field("ID", field::id())
                .field("User ID", field::relationship_id("user"))
                .field("User Name", field::related_string("user", &["name"]))
                .field("User Email", field::related_string("user", &["email-address"]))
                .field("User Mobile", field::related_string("user", &["mobile-number"]))
                .field("Organization", field::polymorphic("organization", "|"))
                .field("Broker Name", field::related_string("broker", NAME_KEYS))
                .field("Project Office", field::related_or_id("project-office", &["name"]))
                .field("Kind", field::string("kind"))
                .field("Admin", field::boolean("is-admin"))
                .field("Title", field::string("title"))
                .field("External Employee ID", field::string("external-employee-id"))
                .field("Starts", field::timestamp("start-at"))
                .field("Ends", field::timestamp("end-at")),
        )
        .build()
}

fn truckers() -> ResourceDescriptor {
    ResourceDescriptor::builder()
        .name("truckers")
        .summary("Trucking companies")
        .path("/v1/truckers")
        .resource_type("truckers")
        .list_fields(&["company-name", "is-active", "broker"])
        .list_include(&["broker"])
        .show_include(&["broker"])
        .related_fields(&[("brokers", &["company-name"])])
        .filters(&[
            "company_name",
            "is_active",
            "broker",
            "q",
            "phone-number",
            "favorite",
            "tax-identifier",
        ])
        .list(
            Projector::new()
                .field("ID", field::id())
                .field("Name", field::string("company-name"))
                .field("Broker", field::related_or_id("broker", NAME_KEYS))
                .field("Active", field::boolean("is-active")),
        )
        .detail(
            Projector::new()
                .field("ID", field::id())
                .field("Company Name", field::string("company-name"))
                .field("Phone", field::string("phone-number"))
                .field("Tax Identifier", field::string("tax-identifier"))
                .field("Trailer Classifications", field::string_list("trailer-classifications"))
                .field("Broker", field::related_or_id("broker", NAME_KEYS))
                .field("Active", field::boolean("is-active")),
        )
        .build()
}

fn users() -> ResourceDescriptor {
    ResourceDescriptor::builder()
        .name("users")
        .summary("People with an account")
        .path("/v1/users")
        .resource_type("users")
        .list_fields(&["name", "email-address", "mobile-number", "is-admin"])
        .filters(&[
            "q",
            "is_admin",
            "email-address",
            "mobile-number",
            "slack-id",
            "is-driver",
        ])
        .list(
            Projector::new()
                .field("ID", field::id())
                .field("Name", field::string("name"))
                .field("Email", field::string("email-address"))
                .field("Mobile", field::string("mobile-number"))
                .field("Admin", field::boolean("is-admin")),
        )
        .detail(
            Projector::new()
                .field("ID", field::id())
                .field("Name", field::string("name"))
                .field("Email", field::string("email-address"))
                .field("Mobile", field::string("mobile-number"))
                .field("Slack ID", field::string("slack-id"))
                .field("Admin", field::boolean("is-admin"))
                .field("Driver", field::boolean("is-driver"))
                .field("Created", field::timestamp("created-at")),
        )
        .build()
}

fn projects() -> ResourceDescriptor {
    ResourceDescriptor::builder()
        .name("projects")
        .summary("Customer projects")
        .path("/v1/projects")
        .resource_type("projects")
        .list_fields(&["name", "number", "status", "created-at", "customer"])
        .list_include(&["customer"])
        .show_include(&["customer", "broker", "project-manager"])
        .related_fields(&[
            ("customers", &["company-name"]),
            ("brokers", &["company-name"]),
            ("users", &["name"]),
        ])
        .filters(&[
            "name",
            "status",
            "number",
            "q",
            "broker",
            "customer",
            "created_at_min",
            "created_at_max",
        ])
        .list(
            Projector::new()
                .field("ID", field::id())
                .field("Name", field::string("name"))
                .field("Number", field::string("number"))
                .field("Status", field::string("status"))
                .field("Customer", field::related_or_id("customer", NAME_KEYS))
                .field("Created", field::timestamp("created-at")),
        )
        .detail(
            Projector::new()
                .field("ID", field::id())
                .field("Name", field::string("name"))
                .field("Number", field::string("number"))
                .field("Status", field::string("status"))
                .field("Customer", field::related_or_id("customer", NAME_KEYS))
                .field("Broker", field::related_or_id("broker", NAME_KEYS))
                .field("Project Manager", field::related_or_id("project-manager", &["name"]))
                .field("Due On", field::string("due-on"))
                .field("Created", field::timestamp("created-at")),
        )
        .build()
}

fn customers() -> ResourceDescriptor {
    ResourceDescriptor::builder()
        .name("customers")
        .summary("Companies that order material and trucking")
        .path("/v1/customers")
        .resource_type("customers")
        .list_fields(&["company-name", "is-active", "broker"])
        .list_include(&["broker"])
        .show_include(&["broker"])
        .related_fields(&[("brokers", &["company-name"])])
        .filters(&["company-name", "is-active", "broker", "q"])
        .list(
            Projector::new()
                .field("ID", field::id())
                .field("Company", field::string("company-name"))
                .field("Broker", field::related_or_id("broker", NAME_KEYS))
                .field("Active", field::boolean("is-active")),
        )
        .detail(
            Projector::new()
                .field("ID", field::id())
                .field("Company Name", field::string("company-name"))
                .field("Broker", field::related_or_id("broker", NAME_KEYS))
                .field("Credit Limit", field::number("credit-limit"))
                .field("Active", field::boolean("is-active"))
                .field("Created", field::timestamp("created-at")),
        )
        .build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Document;

    #[test]
    fn test_broker_commitment_list_row() {
        let doc = Document::parse(
            br#"{
                "data": [{
                    "id": "1",
                    "type": "broker-commitments",
                    "attributes": {"status": "active", "label": "Q3"},
                    "relationships": {
                        "buyer": {"data": {"type": "brokers", "id": "5"}},
                        "seller": {"data": {"type": "truckers", "id": "9"}}
                    }
                }],
                "included": [{"id": "5", "type": "brokers", "attributes": {"company-name": "Acme"}}]
            }"#,
        )
        .unwrap();

        let rows = broker_commitments().list_projector().project_document(&doc);
        let row = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(
            row,
            json!({
                "ID": "1",
                "Status": "active",
                "BuyerType": "brokers",
                "BuyerID": "5",
                "BuyerName": "Acme",
                "Seller": "9",
                "Label": "Q3"
            })
        );
    }

    #[test]
    fn test_membership_broker_falls_back_to_organization() {
        let doc = Document::parse(
            br#"{
                "data": [{
                    "id": "3",
                    "type": "broker-memberships",
                    "relationships": {
                        "organization": {"data": {"type": "brokers", "id": "5"}},
                        "broker": {"data": null}
                    }
                }],
                "included": [{"id": "5", "type": "brokers", "attributes": {"name": "Acme"}}]
            }"#,
        )
        .unwrap();

        let rows = broker_memberships().list_projector().project_document(&doc);
        assert_eq!(rows[0].text("Broker"), "Acme");
    }

    #[test]
    fn test_every_descriptor_has_id_column() {
        for descriptor in all() {
            assert_eq!(
                descriptor.list_projector().columns().next(),
                Some("ID"),
                "{}",
                descriptor.name()
            );
            assert_eq!(descriptor.path(), format!("/v1/{}", descriptor.name()));
        }
    }
}
