//! User-facing notice texts queued as flash messages.

pub const CATEGORY_CREATED: &str = "カテゴリ新規登録が完了しました";
pub const CATEGORY_UPDATED: &str = "カテゴリ更新が完了しました";

pub const EVENT_CREATED: &str = "イベント新規登録が完了しました";
pub const EVENT_UPDATED: &str = "イベント更新が完了しました";
pub const ONLY_MY_EVENTS: &str = "マイイベントのみを更新できます";

pub const EVENT_FULL: &str = "定員です";
pub const ALREADY_JOINED: &str = "イベントに参加済みです";
pub const JOINED: &str = "イベントに参加しました";
pub const NOT_ATTENDING: &str = "イベントに参加していません";
pub const LEFT: &str = "イベントから辞退しました";

pub const CHAT_POSTED: &str = "チャットを投稿しました";
