/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - ex: supabase: SupabaseClient
 * - Clone 前提で持つ (内部は Arc/接続プール で Clone cheap)、起動後は変更しない
 */
use crate::services::supabase::SupabaseClient;

#[derive(Clone, Debug)]
pub struct AppState {
    pub supabase: SupabaseClient,
}

impl AppState {
    pub fn new(supabase: SupabaseClient) -> Self {
        Self { supabase }
    }
}
