//! Ready-made queries for smoke tests and documentation.

pub const NODE_WITH_RELATIONS_QUERY: &str = r#"
    query NodeWithRelations($nodeId: ID) {
        node(nodeId: $nodeId) {
            _id
            name
            trigger {
                _id
                resourceTemplate { _id }
            }
            responses { _id }
            postActions {
                _id
                resourceTemplate { _id }
            }
        }
    }
"#;

pub const NODE_SHALLOW_QUERY: &str = r#"
    query NodeShallow($nodeId: ID) {
        node(nodeId: $nodeId) {
            _id
            name
            createdAt
            colour
        }
    }
"#;

pub const LIST_ALL_QUERY: &str = r#"
    {
        nodes { _id }
        triggers { _id }
        actions { _id }
        responses { _id }
        resourceTemplates { _id }
    }
"#;

pub const TRIGGER_TEMPLATE_QUERY: &str = r#"
    query TriggerTemplate($triggerId: ID) {
        trigger(triggerId: $triggerId) {
            _id
            resourceTemplateId
            resourceTemplate { _id name }
        }
    }
"#;
