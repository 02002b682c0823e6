use super::model::library::Library;

/// 永続化エラーの分類。破損データとI/O失敗を呼び出し側で区別するために使う。
pub trait StorageError: std::error::Error + Send + Sync + 'static {
    /// ファイルは読めたが、蔵書スキーマとして解釈できなかった場合にtrue。
    fn is_corrupt(&self) -> bool;
}

/// 永続化の抽象。Infra層が実装する。
pub trait LibraryRepository {
    type Error: StorageError;

    /// 保存先が存在しなければ空のLibraryを返す。
    fn load(&self) -> Result<Library, Self::Error>;
    fn save(&self, library: &Library) -> Result<(), Self::Error>;
}
