//! Chrome history table schemas.
//!
//! These texts are advertised to MCP clients so they can write queries
//! without inspecting the database first.

/// Tool that queries the `urls` table.
pub const URLS_TOOL: &str = "fetch-urls-from-sqlite";

/// Tool that queries the `visits` table.
pub const VISITS_TOOL: &str = "fetch-visits-info-from-sqlite";

pub const URLS_SCHEMA: &str = "\
CREATE TABLE urls(id INTEGER PRIMARY KEY AUTOINCREMENT,url LONGVARCHAR,title LONGVARCHAR,visit_count INTEGER DEFAULT 0 NOT NULL,typed_count INTEGER DEFAULT 0 NOT NULL,last_visit_time INTEGER NOT NULL,hidden INTEGER DEFAULT 0 NOT NULL);
CREATE INDEX urls_url_index ON urls (url);";

pub const VISITS_SCHEMA: &str = "\
CREATE TABLE visits(id INTEGER PRIMARY KEY AUTOINCREMENT,url INTEGER NOT NULL,visit_time INTEGER NOT NULL,from_visit INTEGER,transition INTEGER DEFAULT 0 NOT NULL,segment_id INTEGER,visit_duration INTEGER DEFAULT 0 NOT NULL,incremented_omnibox_typed_score BOOLEAN DEFAULT FALSE NOT NULL,opener_visit INTEGER,originator_cache_guid TEXT,originator_visit_id INTEGER,originator_from_visit INTEGER,originator_opener_visit INTEGER,is_known_to_sync BOOLEAN DEFAULT FALSE NOT NULL, consider_for_ntp_most_visited BOOLEAN DEFAULT FALSE NOT NULL, external_referrer_url TEXT, visited_link_id INTEGER, app_id TEXT);
CREATE INDEX visits_url_index ON visits (url);
CREATE INDEX visits_from_index ON visits (from_visit);
CREATE INDEX visits_time_index ON visits (visit_time);
CREATE INDEX visits_originator_id_index ON visits (originator_visit_id);";

/// A queryable history table and the tool that exposes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub table: &'static str,
    pub tool: &'static str,
    /// What kind of information the table holds, as phrased to clients.
    pub subject: &'static str,
    pub ddl: &'static str,
}

pub const TABLES: [TableSchema; 2] = [
    TableSchema {
        table: "urls",
        tool: URLS_TOOL,
        subject: "URL",
        ddl: URLS_SCHEMA,
    },
    TableSchema {
        table: "visits",
        tool: VISITS_TOOL,
        subject: "visits",
        ddl: VISITS_SCHEMA,
    },
];

impl TableSchema {
    /// Looks up a table by its tool name.
    pub fn by_tool(tool: &str) -> Option<&'static TableSchema> {
        TABLES.iter().find(|t| t.tool == tool)
    }

    /// Looks up a table by its SQL name.
    pub fn by_table(table: &str) -> Option<&'static TableSchema> {
        TABLES.iter().find(|t| t.table == table)
    }

    /// Tool description advertised to MCP clients.
    pub fn description(&self) -> String {
        format!(
            "Use SQL to query SQLite data tables that contain \"{}\" information of Chrome history. Table schema:\n{}",
            self.subject, self.ddl
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_lookup() {
        assert_eq!(TableSchema::by_tool(URLS_TOOL).unwrap().table, "urls");
        assert_eq!(TableSchema::by_tool(VISITS_TOOL).unwrap().table, "visits");
        assert_eq!(TableSchema::by_table("visits").unwrap().tool, VISITS_TOOL);
        assert!(TableSchema::by_tool("fetch-everything").is_none());
    }

    #[test]
    fn test_description_embeds_schema() {
        let urls = TableSchema::by_table("urls").unwrap();
        let description = urls.description();
        assert!(description.contains("\"URL\" information"));
        assert!(description.contains("CREATE INDEX urls_url_index ON urls (url);"));
    }

    #[test]
    fn test_ddl_is_valid_sqlite() {
        let conn = Connection::open_in_memory().unwrap();
        for table in &TABLES {
            conn.execute_batch(table.ddl)
                .unwrap_or_else(|e| panic!("{} DDL should apply: {e}", table.table));
        }
    }
}
