//! Neo4j access over the HTTP transactional endpoint
//! (`POST {uri}/db/{database}/tx/commit`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::error::{GraphError, GraphResult};
use super::GraphStore;
use crate::config::GraphConfig;
use crate::constants::graph::{
    DATA_RESOURCE_LABEL, PRODUCING_RELATIONSHIPS, STRUCTURAL_RESOURCE_TYPE,
};
use crate::logging::log_graph_operation;
use crate::models::{NodeLookup, TableRef, UnscheduledCount, UnscheduledEntry};

#[derive(Debug, Serialize)]
struct Statement {
    statement: String,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    data: Vec<RowData>,
}

#[derive(Debug, Deserialize)]
struct RowData {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct TxError {
    code: String,
    message: String,
}

fn relationship_pattern() -> String {
    PRODUCING_RELATIONSHIPS.join("|")
}

fn unscheduled_relationships_count_query() -> String {
    format!(
        "MATCH (target)-[rel:{}]->(source) \
         WHERE rel.schedule_status IS NOT NULL AND rel.schedule_status = false \
         RETURN count(DISTINCT rel) AS count",
        relationship_pattern()
    )
}

fn unscheduled_structures_count_query() -> String {
    format!(
        "MATCH (n:{DATA_RESOURCE_LABEL}) \
         WHERE n.type = '{STRUCTURAL_RESOURCE_TYPE}' AND n.schedule_status = false \
         RETURN count(DISTINCT n) AS count"
    )
}

fn unscheduled_relationships_list_query() -> String {
    format!(
        "MATCH (target)-[rel:{}]->(source) \
         WHERE rel.schedule_status IS NOT NULL AND rel.schedule_status = false \
         RETURN DISTINCT target.name, target.en_name, source.name, source.en_name, \
                rel.script_name, rel.schedule_frequency, type(rel)",
        relationship_pattern()
    )
}

fn unscheduled_structures_list_query() -> String {
    format!(
        "MATCH (n:{DATA_RESOURCE_LABEL}) \
         WHERE n.type = '{STRUCTURAL_RESOURCE_TYPE}' AND n.schedule_status = false \
         RETURN DISTINCT n.name, n.en_name, n.script_name, n.schedule_frequency"
    )
}

const NODE_BY_CANONICAL_NAME_QUERY: &str =
    "MATCH (n) WHERE n.en_name = $en_name RETURN n.name AS name LIMIT 1";

/// [`GraphStore`] backed by Neo4j's HTTP API
#[derive(Debug, Clone)]
pub struct Neo4jHttpClient {
    endpoint: String,
    username: String,
    password: String,
    http: Client,
}

impl Neo4jHttpClient {
    pub fn new(config: &GraphConfig) -> GraphResult<Self> {
        let http = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            endpoint: format!(
                "{}/db/{}/tx/commit",
                config.uri.trim_end_matches('/'),
                config.database
            ),
            username: config.username.clone(),
            password: config.password.clone(),
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run statements in one auto-committed transaction; one result per statement.
    async fn run(&self, statements: Vec<Statement>) -> GraphResult<Vec<StatementResult>> {
        let expected = statements.len();
        let response = self
            .http
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .json(&json!({ "statements": statements }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GraphError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: TxResponse = response
            .json()
            .await
            .map_err(|e| GraphError::MalformedResponse(e.to_string()))?;
        into_results(body, expected)
    }
}

fn into_results(body: TxResponse, expected: usize) -> GraphResult<Vec<StatementResult>> {
    if let Some(error) = body.errors.into_iter().next() {
        return Err(GraphError::Query {
            code: error.code,
            message: error.message,
        });
    }

    if body.results.len() != expected {
        return Err(GraphError::MalformedResponse(format!(
            "expected {expected} statement results, got {}",
            body.results.len()
        )));
    }

    Ok(body.results)
}

fn statement(text: String) -> Statement {
    Statement {
        statement: text,
        parameters: json!({}),
    }
}

fn decode_rows<T: serde::de::DeserializeOwned>(result: StatementResult) -> GraphResult<Vec<T>> {
    result
        .data
        .into_iter()
        .map(|data| {
            serde_json::from_value(Value::Array(data.row))
                .map_err(|e| GraphError::MalformedResponse(e.to_string()))
        })
        .collect()
}

fn single_count(result: StatementResult) -> GraphResult<i64> {
    let counts: Vec<(i64,)> = decode_rows(result)?;
    Ok(counts.first().map_or(0, |(count,)| *count))
}

type RelationshipRow = (
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

type StructureRow = (
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn relationship_entry(row: RelationshipRow) -> UnscheduledEntry {
    let (target_name, target_en, source_name, source_en, script, frequency, kind) = row;
    UnscheduledEntry {
        target_table: TableRef {
            display_name: target_name,
            canonical_name: target_en,
        },
        source_table: Some(TableRef {
            display_name: source_name,
            canonical_name: source_en,
        }),
        script_name: script,
        schedule_frequency: frequency,
        relation_kind: kind,
    }
}

fn structure_entry(row: StructureRow) -> UnscheduledEntry {
    let (name, en_name, script, frequency) = row;
    UnscheduledEntry {
        target_table: TableRef {
            display_name: name,
            canonical_name: en_name,
        },
        source_table: None,
        script_name: script,
        schedule_frequency: frequency,
        relation_kind: None,
    }
}

#[async_trait]
impl GraphStore for Neo4jHttpClient {
    #[instrument(skip(self))]
    async fn unscheduled_count(&self) -> GraphResult<UnscheduledCount> {
        let mut results = self
            .run(vec![
                statement(unscheduled_relationships_count_query()),
                statement(unscheduled_structures_count_query()),
            ])
            .await?
            .into_iter();

        let relationships = results.next().map(single_count).transpose()?.unwrap_or(0);
        let structural_nodes = results.next().map(single_count).transpose()?.unwrap_or(0);
        let count = UnscheduledCount::new(relationships, structural_nodes);

        log_graph_operation(
            "unscheduled_count",
            "ok",
            Some(&format!(
                "relationships={relationships} structural_nodes={structural_nodes}"
            )),
        );
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn unscheduled_list(&self) -> GraphResult<Vec<UnscheduledEntry>> {
        let mut results = self
            .run(vec![
                statement(unscheduled_relationships_list_query()),
                statement(unscheduled_structures_list_query()),
            ])
            .await?
            .into_iter();

        let mut entries: Vec<UnscheduledEntry> = match results.next() {
            Some(result) => decode_rows::<RelationshipRow>(result)?
                .into_iter()
                .map(relationship_entry)
                .collect(),
            None => Vec::new(),
        };
        if let Some(result) = results.next() {
            entries.extend(
                decode_rows::<StructureRow>(result)?
                    .into_iter()
                    .map(structure_entry),
            );
        }

        log_graph_operation(
            "unscheduled_list",
            "ok",
            Some(&format!("entries={}", entries.len())),
        );
        Ok(entries)
    }

    #[instrument(skip(self))]
    async fn check_node_by_canonical_name(&self, canonical_name: &str) -> GraphResult<NodeLookup> {
        let results = self
            .run(vec![Statement {
                statement: NODE_BY_CANONICAL_NAME_QUERY.to_string(),
                parameters: json!({ "en_name": canonical_name }),
            }])
            .await?;

        let lookup = match results.into_iter().next() {
            Some(result) => {
                let rows: Vec<(Option<String>,)> = decode_rows(result)?;
                rows.into_iter()
                    .next()
                    .map_or_else(NodeLookup::missing, |(name,)| NodeLookup::found(name))
            }
            None => NodeLookup::missing(),
        };

        debug!(exists = lookup.exists, "Node lookup complete");
        Ok(lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: Value) -> TxResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = GraphConfig {
            uri: "http://graph.internal:7474/".to_string(),
            ..GraphConfig::default()
        };
        let client = Neo4jHttpClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://graph.internal:7474/db/neo4j/tx/commit"
        );
    }

    #[test]
    fn test_count_queries_use_distinct() {
        let relationships = unscheduled_relationships_count_query();
        assert!(relationships.contains("DERIVED_FROM|ORIGINATES_FROM"));
        assert!(relationships.contains("count(DISTINCT rel)"));

        let structures = unscheduled_structures_count_query();
        assert!(structures.contains("n:DataResource"));
        assert!(structures.contains("n.type = 'structure'"));
        assert!(structures.contains("count(DISTINCT n)"));
    }

    #[test]
    fn test_count_results_decode() {
        let body = parse(json!({
            "results": [
                {"columns": ["count"], "data": [{"row": [2], "meta": [null]}]},
                {"columns": ["count"], "data": [{"row": [1], "meta": [null]}]}
            ],
            "errors": []
        }));

        let mut results = into_results(body, 2).unwrap().into_iter();
        assert_eq!(single_count(results.next().unwrap()).unwrap(), 2);
        assert_eq!(single_count(results.next().unwrap()).unwrap(), 1);
    }

    #[test]
    fn test_statement_errors_surface() {
        let body = parse(json!({
            "results": [],
            "errors": [{"code": "Neo.ClientError.Statement.SyntaxError", "message": "bad"}]
        }));

        match into_results(body, 1) {
            Err(GraphError::Query { code, .. }) => {
                assert_eq!(code, "Neo.ClientError.Statement.SyntaxError");
            }
            other => panic!("expected query error, got {other:?}"),
        }
    }

    #[test]
    fn test_relationship_rows_decode_with_nulls() {
        let body = parse(json!({
            "results": [{
                "columns": [],
                "data": [{"row": ["Orders", "orders", null, "raw_orders", "load.py", "daily", "DERIVED_FROM"]}]
            }]
        }));

        let result = into_results(body, 1).unwrap().into_iter().next().unwrap();
        let entries: Vec<UnscheduledEntry> = decode_rows::<RelationshipRow>(result)
            .unwrap()
            .into_iter()
            .map(relationship_entry)
            .collect();

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.target_table.canonical_name.as_deref(), Some("orders"));
        let source = entry.source_table.as_ref().unwrap();
        assert_eq!(source.display_name, None);
        assert_eq!(source.canonical_name.as_deref(), Some("raw_orders"));
        assert_eq!(entry.relation_kind.as_deref(), Some("DERIVED_FROM"));
    }

    #[test]
    fn test_result_count_mismatch_is_malformed() {
        let body = parse(json!({"results": [], "errors": []}));
        assert!(matches!(
            into_results(body, 2),
            Err(GraphError::MalformedResponse(_))
        ));
    }
}
