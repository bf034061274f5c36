/*
 * Responsibility
 * - 外部サービス (Supabase auth + PostgREST) のクライアント
 */
pub mod supabase;
