/// いいね・保存のように (post_id, user_id) の有無だけを持つテーブル用のクエリ
pub(super) struct FlagQueries {
    pub exists: &'static str,
    pub delete: &'static str,
    pub insert: &'static str,
    pub post_ids_by_user: &'static str,
}

pub(super) const LIKES: FlagQueries = FlagQueries {
    exists: r#"
        SELECT EXISTS(SELECT 1 FROM likes WHERE post_id = ?1 AND user_id = ?2)
    "#,
    delete: r#"
        DELETE FROM likes
        WHERE post_id = ?1 AND user_id = ?2
    "#,
    insert: r#"
        INSERT INTO likes (post_id, user_id, created_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(post_id, user_id) DO NOTHING
    "#,
    post_ids_by_user: r#"
        SELECT post_id
        FROM likes
        WHERE user_id = ?1
        ORDER BY created_at DESC, rowid DESC
    "#,
};

pub(super) const SAVES: FlagQueries = FlagQueries {
    exists: r#"
        SELECT EXISTS(SELECT 1 FROM saves WHERE post_id = ?1 AND user_id = ?2)
    "#,
    delete: r#"
        DELETE FROM saves
        WHERE post_id = ?1 AND user_id = ?2
    "#,
    insert: r#"
        INSERT INTO saves (post_id, user_id, created_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(post_id, user_id) DO NOTHING
    "#,
    post_ids_by_user: r#"
        SELECT post_id
        FROM saves
        WHERE user_id = ?1
        ORDER BY created_at DESC, rowid DESC
    "#,
};

pub(super) const COUNT_LIKES_BY_POST: &str = r#"
    SELECT COUNT(*) FROM likes WHERE post_id = ?1
"#;

pub(super) const INSERT_COMMENT: &str = r#"
    INSERT INTO comments (id, post_id, author_id, author_name, author_photo_url, text, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub(super) const SELECT_COMMENTS_BY_POST: &str = r#"
    SELECT id, post_id, author_id, author_name, author_photo_url, text, created_at
    FROM comments
    WHERE post_id = ?1
    ORDER BY created_at ASC, rowid ASC
"#;

pub(super) const SELECT_COMMENT_AUTHOR: &str = r#"
    SELECT author_id FROM comments WHERE id = ?1 AND post_id = ?2
"#;

pub(super) const DELETE_COMMENT: &str = r#"
    DELETE FROM comments WHERE id = ?1 AND post_id = ?2
"#;
