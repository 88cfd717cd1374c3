use uuid::Uuid;

pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind{
    Jpeg,
    Png,
    Webp
}

impl ImageKind {
    pub fn from_content_type(content_type: &str) -> Result<Self, String> {
        // Drop parameters such as `; charset=binary`
        let mime = content_type.split(';').next().unwrap_or("").trim().to_lowercase();
        match mime.as_str() {
            "image/jpeg" | "image/jpg" => Ok(ImageKind::Jpeg),
            "image/png" => Ok(ImageKind::Png),
            "image/webp" => Ok(ImageKind::Webp),
            _ => Err(format!("Unsupported image type '{}', use jpeg, png or webp", mime))
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Webp => "webp"
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Webp => "image/webp"
        }
    }
}

#[derive(Debug)]
pub struct AvatarUpload{
    pub kind: ImageKind,
    pub object_name: String
}

impl AvatarUpload {
    pub fn new(content_type: Option<&str>, size: usize) -> Result<Self, String> {
        let kind = ImageKind::from_content_type(content_type.unwrap_or(""))?;
        if size == 0 {
            return Err("Avatar file is empty".to_string());
        }
        if size > MAX_AVATAR_BYTES {
            return Err(format!("Avatar must be at most {} bytes", MAX_AVATAR_BYTES));
        }

        Ok(Self{
            kind,
            object_name: format!("{}.{}", Uuid::new_v4(), kind.extension())
        })
    }
}
