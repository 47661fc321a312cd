//! # ユーザー・チャンネル識別子
//!
//! チャットプラットフォームから渡される識別子を値オブジェクトとして定義する。
//! どちらも不透明な文字列で、内容の解釈は行わない。
//!
//! | 型 | 用途 |
//! |---|------|
//! | [`UserId`] | フォーカスセッションの一意キー |
//! | [`ChannelId`] | 通知先チャンネル |

define_validated_string! {
    /// ユーザー ID
    ///
    /// 前後の空白を除去したうえで、空文字と 128 文字超を拒否する。
    pub struct UserId {
        label: "ユーザー ID",
        max_length: 128,
    }
}

define_validated_string! {
    /// チャンネル ID
    pub struct ChannelId {
        label: "チャンネル ID",
        max_length: 128,
    }
}
