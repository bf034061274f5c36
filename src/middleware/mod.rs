/*
 * Responsibility
 * - middleware の公開インターフェース (関心ごとの apply 関数)
 */
pub mod auth;
pub mod cors;
pub mod http;
