//! MCP Server for book-shelf
//!
//! MCP Protocol (stdio) <-> application::LibraryService / ExportService
//!
//! 9 tools: book_add, book_remove, book_update, book_toggle_read, book_search,
//! book_list, book_sort, library_stats, library_export

use std::path::PathBuf;

use rmcp::{
    handler::server::{tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::application::error::AppError;
use crate::application::export::ExportService;
use crate::application::service::LibraryService;
use crate::config::Config;
use crate::domain::error::DomainError;
use crate::domain::model::book::{AddBookRequest, UpdateBookRequest};
use crate::domain::model::library::{SearchField, SortKey};
use crate::infra::json_store::JsonLibraryRepository;

// =============================================================================
// Public entry point
// =============================================================================

/// MCP Serverを起動する。
pub async fn run(config: &Config) -> anyhow::Result<()> {
    let server = LibraryMcpServer::new(config);
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

// =============================================================================
// MCP Server
// =============================================================================

#[derive(Clone)]
struct LibraryMcpServer {
    library_path: PathBuf,
    export_path: PathBuf,
    tool_router: ToolRouter<Self>,
}

impl LibraryMcpServer {
    fn new(config: &Config) -> Self {
        Self {
            library_path: config.library_path.clone(),
            export_path: config.export_path.clone(),
            tool_router: Self::tool_router(),
        }
    }

    fn service(&self) -> LibraryService<JsonLibraryRepository> {
        LibraryService::new(JsonLibraryRepository::new(&self.library_path))
    }

    /// 入力起因のエラーはinvalid_params、それ以外はinternal_error。
    fn to_mcp_error(e: AppError) -> McpError {
        match e {
            AppError::Domain(
                DomainError::NotFound(_)
                | DomainError::Validation(_)
                | DomainError::InvalidArgument(_),
            ) => McpError::invalid_params(format!("{e}"), None),
            other => McpError::internal_error(format!("{other}"), None),
        }
    }
}

// =============================================================================
// ServerHandler impl
// =============================================================================

impl ServerHandler for LibraryMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "book-shelf".to_string(),
                title: Some("Book Shelf — Personal Library".to_string()),
                description: Some(
                    "Personal book library: add, edit, search, sort and export books.".to_string(),
                ),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Manage a personal book library.\n\
                 \n\
                 Books are addressed by title (case-insensitive). When several books share a \
                 title, only the first one in list order is affected.\n\
                 \n\
                 Tools: `book_list` → `book_add`/`book_update`/`book_toggle_read`/`book_remove`, \
                 `book_search`, `book_sort`, `library_stats`, `library_export`."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_ctx = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_ctx).await
    }
}

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookAddRequest {
    #[schemars(description = "Book title")]
    pub title: String,
    #[schemars(description = "Author name")]
    pub author: String,
    #[schemars(description = "Publication year (integer, e.g. '1965')")]
    pub year: String,
    #[schemars(description = "Genre")]
    pub genre: String,
    #[schemars(description = "Already read? (default: false)")]
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpTitleRequest {
    #[schemars(description = "Book title (case-insensitive, first match)")]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookUpdateRequest {
    #[schemars(description = "Current book title (case-insensitive, first match)")]
    pub title: String,
    #[schemars(description = "New title (omit to keep current)")]
    pub new_title: Option<String>,
    #[schemars(description = "New author (omit to keep current)")]
    pub author: Option<String>,
    #[schemars(description = "New publication year (omit to keep current)")]
    pub year: Option<String>,
    #[schemars(description = "New genre (omit to keep current)")]
    pub genre: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpSearchRequest {
    #[schemars(description = "Field to search: title or author")]
    pub field: String,
    #[schemars(description = "Case-insensitive substring. Empty matches every book.")]
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpSortRequest {
    #[schemars(description = "Sort key: title, author or year")]
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpExportRequest {
    #[schemars(description = "Output file path (default: configured export file)")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpEmptyRequest {}

// =============================================================================
// Tool implementations
// =============================================================================

#[tool_router]
impl LibraryMcpServer {
    #[tool(
        name = "book_add",
        description = "Add a book to the end of the library. Titles need not be unique.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_add(
        &self,
        Parameters(req): Parameters<McpBookAddRequest>,
    ) -> Result<CallToolResult, McpError> {
        let add_req =
            AddBookRequest::from_input(&req.title, &req.author, &req.year, &req.genre, req.read)
                .map_err(|e| Self::to_mcp_error(e.into()))?;

        let line = self
            .service()
            .apply(|lib| Ok(lib.add_book(add_req).to_string()))
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Added: {line}"
        ))]))
    }

    #[tool(
        name = "book_remove",
        description = "Remove the first book whose title matches (case-insensitive).",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_remove(
        &self,
        Parameters(req): Parameters<McpTitleRequest>,
    ) -> Result<CallToolResult, McpError> {
        let removed = self
            .service()
            .apply(|lib| lib.remove_book(&req.title))
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Removed: {removed}"
        ))]))
    }

    #[tool(
        name = "book_update",
        description = "Edit title, author, year or genre of the first matching book. Omitted or blank fields are kept.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn book_update(
        &self,
        Parameters(req): Parameters<McpBookUpdateRequest>,
    ) -> Result<CallToolResult, McpError> {
        let update_req = UpdateBookRequest::from_input(
            req.new_title.as_deref().unwrap_or_default(),
            req.author.as_deref().unwrap_or_default(),
            req.year.as_deref().unwrap_or_default(),
            req.genre.as_deref().unwrap_or_default(),
        )
        .map_err(|e| Self::to_mcp_error(e.into()))?;

        let line = self
            .service()
            .apply(|lib| {
                lib.update_book(&req.title, update_req)
                    .map(|b| b.to_string())
            })
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Updated: {line}"
        ))]))
    }

    #[tool(
        name = "book_toggle_read",
        description = "Flip the read/unread status of the first matching book.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_toggle_read(
        &self,
        Parameters(req): Parameters<McpTitleRequest>,
    ) -> Result<CallToolResult, McpError> {
        let status = self
            .service()
            .apply(|lib| lib.toggle_read(&req.title))
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Book marked as {status}."
        ))]))
    }

    #[tool(
        name = "book_search",
        description = "Find books whose title or author contains the query (case-insensitive). Library is NOT modified.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_search(
        &self,
        Parameters(req): Parameters<McpSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let field: SearchField = req
            .field
            .parse()
            .map_err(|e: DomainError| Self::to_mcp_error(e.into()))?;
        let library = self.service().load().map_err(Self::to_mcp_error)?;

        let results = library.search(field, &req.query);
        if results.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "No matching books found.",
            )]));
        }
        Ok(CallToolResult::success(vec![Content::text(
            ExportService::render_listing(results),
        )]))
    }

    #[tool(
        name = "book_list",
        description = "List every book in current order, numbered from 1.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_list(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpEmptyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let library = self.service().load().map_err(Self::to_mcp_error)?;
        if library.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "Your library is empty. Use `book_add` to add books.",
            )]));
        }
        Ok(CallToolResult::success(vec![Content::text(
            ExportService::render_listing(library.books()),
        )]))
    }

    #[tool(
        name = "book_sort",
        description = "Reorder the library by title, author (case-insensitive) or year. Stable; the new order is saved.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn book_sort(
        &self,
        Parameters(req): Parameters<McpSortRequest>,
    ) -> Result<CallToolResult, McpError> {
        let key: SortKey = req
            .key
            .parse()
            .map_err(|e: DomainError| Self::to_mcp_error(e.into()))?;

        self.service()
            .apply(|lib| {
                lib.sort_by(key);
                Ok(())
            })
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(
            "Books sorted successfully!",
        )]))
    }

    #[tool(
        name = "library_stats",
        description = "Show total number of books and the percentage read.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn library_stats(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpEmptyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let library = self.service().load().map_err(Self::to_mcp_error)?;
        let text = ExportService::render_statistics(&library.statistics());
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        name = "library_export",
        description = "Write every book as one plain-text line to a file, overwriting it. Library is NOT modified.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn library_export(
        &self,
        Parameters(req): Parameters<McpExportRequest>,
    ) -> Result<CallToolResult, McpError> {
        let library = self.service().load().map_err(Self::to_mcp_error)?;
        let path = req
            .path
            .map(PathBuf::from)
            .unwrap_or_else(|| self.export_path.clone());

        let path = ExportService::export(&library, &path).map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Library exported to: {}",
            path.display()
        ))]))
    }
}

// =============================================================================
// Tests
// =============================================================================
