mod pretty_json;

pub use pretty_json::pretty_json_middleware;
