//! 카테고리별 JSON 레코드 로그.
//!
//! `Augmentation/<카테고리>/Augmentation_<카테고리>.json` 에 레코드 배열을
//! 4칸 들여쓰기, 비 ASCII 문자 그대로 기록한다 (기존 코퍼스와 바이트 호환).
//!
//! 같은 로그에 대한 읽기-수정-쓰기는 카테고리별 뮤텍스로 직렬화하고,
//! 쓰기는 임시 파일 + rename 으로 원자적으로 교체한다.
//! 파싱할 수 없는 로그는 `CorruptLog` 에러로 보고하며 절대 덮어쓰지 않는다.

use async_trait::async_trait;
use painlabel_core::error::CoreError;
use painlabel_core::models::category::{Category, CategorySet};
use painlabel_core::models::record::{Record, RecordIdentity};
use painlabel_core::ports::storage::{ReconcileOutcome, RecordLog};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use tokio::fs;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::layout::StorageLayout;

/// JSON 파일 레코드 로그 (`RecordLog` 구현)
pub struct JsonRecordLog {
    layout: StorageLayout,
    categories: CategorySet,
    /// 카테고리별 쓰기 직렬화
    locks: HashMap<Category, Mutex<()>>,
}

/// 레코드 배열 직렬화 (4칸 들여쓰기)
pub fn encode_log(records: &[Record]) -> Result<Vec<u8>, CoreError> {
    let mut out = Vec::with_capacity(records.len() * 160);
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    records.serialize(&mut serializer)?;
    Ok(out)
}

/// 로그 파일 내용 파싱. 비어 있으면 빈 목록.
pub fn decode_log(category: &Category, bytes: &[u8]) -> Result<Vec<Record>, CoreError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(bytes).map_err(|e| CoreError::CorruptLog {
        category: category.to_string(),
        message: e.to_string(),
    })
}

impl JsonRecordLog {
    pub fn new(layout: StorageLayout, categories: CategorySet) -> Self {
        let locks = categories
            .iter()
            .map(|c| (c.clone(), Mutex::new(())))
            .collect();
        Self {
            layout,
            categories,
            locks,
        }
    }

    fn lock_for(&self, category: &Category) -> Result<&Mutex<()>, CoreError> {
        self.locks.get(category).ok_or_else(|| CoreError::NotFound {
            resource_type: "Category".to_string(),
            id: category.to_string(),
        })
    }

    /// 여러 카테고리 잠금을 이름순으로 획득 (중복 제거)
    async fn lock_all(
        &self,
        categories: &[Category],
    ) -> Result<Vec<(Category, MutexGuard<'_, ()>)>, CoreError> {
        let mut ordered = categories.to_vec();
        ordered.sort();
        ordered.dedup();

        let mut guards = Vec::with_capacity(ordered.len());
        for category in ordered {
            let guard = self.lock_for(&category)?.lock().await;
            guards.push((category, guard));
        }
        Ok(guards)
    }

    /// 잠긴 카테고리 로그를 모두 읽는다. 하나라도 실패하면 에러.
    async fn read_locked(
        &self,
        locked: &[(Category, MutexGuard<'_, ()>)],
    ) -> Result<Vec<(Category, Vec<Record>)>, CoreError> {
        let mut logs = Vec::with_capacity(locked.len());
        for (category, _) in locked {
            let records = self.read_log(category).await?;
            logs.push((category.clone(), records));
        }
        Ok(logs)
    }

    /// 잠금은 호출 측이 보유
    async fn read_log(&self, category: &Category) -> Result<Vec<Record>, CoreError> {
        let path = self.layout.log_path(category);
        match fs::read(&path).await {
            Ok(bytes) => decode_log(category, &bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// 잠금은 호출 측이 보유
    async fn write_log(&self, category: &Category, records: &[Record]) -> Result<(), CoreError> {
        let dir = self.layout.log_dir(category);
        fs::create_dir_all(&dir).await?;

        let path = self.layout.log_path(category);
        let tmp = dir.join(format!(".{}.tmp", category.log_file_name()));
        fs::write(&tmp, encode_log(records)?).await?;
        fs::rename(&tmp, &path).await?;

        debug!("레코드 로그 기록: {} ({}개)", path.display(), records.len());
        Ok(())
    }
}

/// 배치 내부에서 식별자가 같은 레코드는 첫 번째만 남긴다
fn dedup_batch(records: &[Record]) -> Vec<Record> {
    let mut seen: HashSet<RecordIdentity<'_>> = HashSet::with_capacity(records.len());
    records
        .iter()
        .filter(|r| seen.insert(r.identity()))
        .cloned()
        .collect()
}

#[async_trait]
impl RecordLog for JsonRecordLog {
    async fn load(&self, category: &Category) -> Result<Vec<Record>, CoreError> {
        let _guard = self.lock_for(category)?.lock().await;
        self.read_log(category).await
    }

    async fn append_records(
        &self,
        category: &Category,
        records: &[Record],
    ) -> Result<(), CoreError> {
        let _guard = self.lock_for(category)?.lock().await;
        let mut existing = self.read_log(category).await?;
        existing.extend_from_slice(records);
        self.write_log(category, &existing).await?;
        debug!("{}: 레코드 {}개 추가", category, records.len());
        Ok(())
    }

    async fn verify_logs(&self, categories: &[Category]) -> Result<(), CoreError> {
        let locked = self.lock_all(categories).await?;
        self.read_locked(&locked).await?;
        Ok(())
    }

    async fn reconcile_against_existing(
        &self,
        new_records: &[Record],
        categories: &[Category],
    ) -> Result<ReconcileOutcome, CoreError> {
        let records = dedup_batch(new_records);
        let mut removed_from_existing = 0;

        {
            let identities: HashSet<RecordIdentity<'_>> =
                records.iter().map(Record::identity).collect();

            // 1. 전부 읽기. 손상된 로그가 있으면 여기서 중단
            let locked = self.lock_all(categories).await?;
            let logs = self.read_locked(&locked).await?;

            // 2. 변경된 로그만 쓰기
            for (category, existing) in logs {
                let before = existing.len();
                let kept: Vec<Record> = existing
                    .into_iter()
                    .filter(|r| !identities.contains(&r.identity()))
                    .collect();

                let removed = before - kept.len();
                if removed > 0 {
                    self.write_log(&category, &kept).await?;
                    info!("{}: 중복 레코드 {}개 제거", category, removed);
                    removed_from_existing += removed;
                }
            }
        }

        Ok(ReconcileOutcome {
            records,
            removed_from_existing,
        })
    }

    async fn delete_records_by_path(&self, path: &str) -> Result<usize, CoreError> {
        let mut present = Vec::with_capacity(self.categories.len());
        for category in &self.categories {
            if fs::try_exists(self.layout.log_dir(category)).await? {
                present.push(category.clone());
            } else {
                debug!("{}: 로그 디렉토리 없음 (건너뜀)", category);
            }
        }

        let locked = self.lock_all(&present).await?;
        let logs = self.read_locked(&locked).await?;

        let mut removed_total = 0;
        for (category, existing) in logs {
            let before = existing.len();
            let kept: Vec<Record> = existing.into_iter().filter(|r| r.path != path).collect();
            removed_total += before - kept.len();

            // 변경 여부와 무관하게 다시 기록
            self.write_log(&category, &kept).await?;
        }

        info!("경로 참조 레코드 {}개 제거: {}", removed_total, path);
        Ok(removed_total)
    }
}
