use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::IconError;
use crate::config::MAX_CONTAINER_SIZE;
use crate::models::SizeVariant;
use crate::utils::StagedFile;

/// 从磁盘上已生成的 PNG 组装多分辨率 ICO
///
/// 每个尺寸重新打开对应文件，而不是复用内存中的渲染结果；
/// 任意一个尺寸缺失或不合法都会使整个容器失败，已有 PNG 不受影响。
pub fn assemble_icon(variants: &[SizeVariant], destination: &Path) -> Result<u64, IconError> {
    if variants.is_empty() {
        return Err(IconError::Empty);
    }

    let mut icon_dir = ico::IconDir::new(ico::ResourceType::Icon);
    for variant in variants {
        if variant.size == 0 || variant.size > MAX_CONTAINER_SIZE {
            return Err(IconError::UnsupportedSize(variant.size));
        }

        let file = File::open(&variant.path).map_err(|source| IconError::MissingVariant {
            size: variant.size,
            path: variant.path.clone(),
            source,
        })?;
        let image = ico::IconImage::read_png(BufReader::new(file)).map_err(|source| {
            IconError::Decode {
                path: variant.path.clone(),
                source,
            }
        })?;

        if image.width() != variant.size || image.height() != variant.size {
            return Err(IconError::DimensionMismatch {
                path: variant.path.clone(),
                expected: variant.size,
                width: image.width(),
                height: image.height(),
            });
        }

        let entry = ico::IconDirEntry::encode(&image).map_err(|source| IconError::Encode {
            size: variant.size,
            source,
        })?;
        icon_dir.add_entry(entry);
    }

    let write_err = |source| IconError::Write {
        path: destination.to_path_buf(),
        source,
    };
    let mut staged = StagedFile::create(destination).map_err(write_err)?;
    icon_dir.write(&mut staged).map_err(write_err)?;
    let bytes = staged.commit().map_err(write_err)?;

    log::debug!(
        "Assembled {:?} with {} entries ({} bytes)",
        destination,
        variants.len(),
        bytes
    );
    Ok(bytes)
}
