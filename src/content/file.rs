//! # Carga de Archivos
//! src/content/file.rs
//!
//! Lee archivos del directorio raíz del servidor. Distingue "no existe" de
//! los demás errores de I/O: el primero termina en 404, el resto en 500.

use std::fs;
use std::io;

/// Contenido de un archivo cargado de disco
#[derive(Debug, Clone)]
pub struct FileData {
    /// Bytes del archivo
    pub bytes: Vec<u8>,
}

impl FileData {
    /// Tamaño del archivo en bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Errores al cargar un archivo
#[derive(Debug)]
pub enum FileError {
    /// El archivo no existe (o el path apunta a un directorio)
    NotFound,

    /// El path intenta salir del directorio raíz (componentes "..")
    InvalidPath,

    /// Cualquier otro error de I/O
    Io(io::Error),
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileError::NotFound => write!(f, "File not found"),
            FileError::InvalidPath => write!(f, "Invalid file path"),
            FileError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for FileError {}

/// Carga un recurso desde el directorio raíz.
///
/// `resource` es el path tal como llegó en el request (ej: "/index.html");
/// se resuelve relativo a `root`. Los paths con componentes ".." se
/// rechazan antes de tocar el disco.
///
/// # Ejemplo
/// ```no_run
/// use static_server::content::file;
///
/// let data = file::load("./serverroot", "/index.html").unwrap();
/// println!("{} bytes", data.size());
/// ```
pub fn load(root: &str, resource: &str) -> Result<FileData, FileError> {
    // Rechazar traversal: nada de escapar del directorio raíz
    if resource.split('/').any(|component| component == "..") {
        return Err(FileError::InvalidPath);
    }

    let full_path = format!("{}{}", root, resource);

    // Un directorio no es servible: cuenta como no encontrado
    match fs::metadata(&full_path) {
        Ok(meta) if !meta.is_file() => return Err(FileError::NotFound),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(FileError::NotFound),
        Err(e) => return Err(FileError::Io(e)),
    }

    match fs::read(&full_path) {
        Ok(bytes) => Ok(FileData { bytes }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(FileError::NotFound),
        Err(e) => Err(FileError::Io(e)),
    }
}
