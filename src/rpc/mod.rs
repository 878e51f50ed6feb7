//! JSON-RPC boundary over stdio.
//!
//! Exposes the statistic store and the cache counters to a request-handling
//! layer living in another process.
//!
//! ## Tools
//!
//! - `stratus_record_sample` - Records a daily mean temperature
//! - `stratus_statistics` - Statistics for a location
//! - `stratus_cache_status` - Store counters, plus entity cache counters when shared
//!
//! ## Example
//!
//! ```text
//! {"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"stratus_statistics","arguments":{"location":"Rome"}}}
//! {"jsonrpc":"2.0","id":1,"result":{"content":"not enough data yet for this location: Rome","isError":true}}
//! ```

mod protocol;
mod server;
mod tools;
mod transport;

pub use protocol::{
    CallToolParams, InitializeResult, JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult, ServerInfo, ToolDescription, ToolResult, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
};
pub use server::RpcServer;
pub use tools::{RecordSampleParams, StatisticsParams, ToolHandler};
pub use transport::LineTransport;
