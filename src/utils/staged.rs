//! 原子落盘
//!
//! 先写入目标同目录下的临时文件 `.<name>.<uuid>.part`，成功后 rename 到目标路径；
//! 未 commit 就被 drop（出错提前返回、panic 展开）时删除临时文件，
//! 保证目标路径上不会出现写了一半的文件。

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub struct StagedFile {
    destination: PathBuf,
    temp_path: PathBuf,
    file: Option<File>,
    written: u64,
}

impl StagedFile {
    /// 在目标文件所在目录创建临时文件
    pub fn create(destination: impl Into<PathBuf>) -> io::Result<Self> {
        let destination = destination.into();
        let file_name = destination.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("destination has no file name: {:?}", destination),
            )
        })?;

        let temp_name = format!(
            ".{}.{}.part",
            file_name.to_string_lossy(),
            uuid::Uuid::new_v4().simple()
        );
        let temp_path = destination.with_file_name(temp_name);
        let file = File::create(&temp_path)?;
        log::debug!("Staging {:?} at {:?}", destination, temp_path);

        Ok(Self {
            destination,
            temp_path,
            file: Some(file),
            written: 0,
        })
    }

    /// 一次性写入完整内容并提交
    pub fn write_atomic(destination: impl Into<PathBuf>, contents: &[u8]) -> io::Result<u64> {
        let mut staged = Self::create(destination)?;
        staged.write_all(contents)?;
        staged.commit()
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// 刷盘并 rename 到目标路径，返回写入字节数
    pub fn commit(mut self) -> io::Result<u64> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            file.sync_all()?;
        }
        fs::rename(&self.temp_path, &self.destination)?;
        // rename 之后 temp_path 已不存在，Drop 不会再删除
        Ok(self.written)
    }

    fn file_mut(&mut self) -> io::Result<&mut File> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("staged file already closed"))
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.file_mut()?.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file_mut()?.flush()
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        // 必须先关闭句柄，Windows 上才能删除
        drop(self.file.take());
        if self.temp_path.exists() {
            if let Err(e) = fs::remove_file(&self.temp_path) {
                log::warn!("Failed to remove staged file {:?}: {}", self.temp_path, e);
            } else {
                log::debug!("Discarded staged file {:?}", self.temp_path);
            }
        }
    }
}
