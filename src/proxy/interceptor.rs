// Interceptor module - for future enhancements
//
// This module is reserved for more advanced interception logic,
// such as request/response modification, rate limiting, or custom
// filtering rules. For now, all interception logic is in mod.rs.
//
// Future enhancements could include:
// - Request replay functionality
// - Response caching
// - Custom filtering rules
// - Rate limiting and throttling
// - Request/response transformation

// Placeholder for future functionality
