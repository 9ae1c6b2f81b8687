//! Datos de demostración
//!
//! Se cargan con `SEED_DEMO_DATA=true` y sólo sobre tablas vacías. Escribe a
//! través de los repositorios, así que sirve para ambos backends.

use tracing::info;

use crate::models::asignacion::AssignmentSide;
use crate::models::entity::{EntityId, FieldChange};
use crate::models::{Camion, Cliente, DiaEntrega, Usuario};
use crate::state::Stores;
use crate::utils::errors::AppResult;
use crate::utils::password::hash_password;

const DIAS: [&str; 5] = ["Lunes", "Martes", "Miércoles", "Jueves", "Viernes"];

const CAMIONES: [&str; 5] = [
    "Daniel Torres",
    "Alvaro Garcia",
    "Robert Labruna",
    "Jose Luis",
    "Reparto Nuevo",
];

/// Días asignados a cada camión, por posición en las listas de arriba
const RELACIONES: [(usize, &[usize]); 3] = [(0, &[0, 1]), (1, &[2, 3]), (2, &[4])];

struct ClienteDemo {
    nombre: &'static str,
    razon: &'static str,
    direccion: &'static str,
    telefono: &'static str,
    rut: &'static str,
    x: f64,
    y: f64,
}

const CLIENTES: [ClienteDemo; 2] = [
    ClienteDemo {
        nombre: "Empresa ABC",
        razon: "ABC S.A.",
        direccion: "Av. Principal 123",
        telefono: "+56912345678",
        rut: "12345678-9",
        x: -70.6693,
        y: -33.4489,
    },
    ClienteDemo {
        nombre: "Comercial XYZ",
        razon: "XYZ Ltda.",
        direccion: "Calle Secundaria 456",
        telefono: "+56987654321",
        rut: "87654321-K",
        x: -70.6483,
        y: -33.4569,
    },
];

impl ClienteDemo {
    fn changes(&self) -> Vec<FieldChange> {
        vec![
            FieldChange::text("codigo_alternativo", None),
            FieldChange::text("nombre", Some(self.nombre.to_string())),
            FieldChange::text("razon", Some(self.razon.to_string())),
            FieldChange::text("direccion", Some(self.direccion.to_string())),
            FieldChange::text("telefono", Some(self.telefono.to_string())),
            FieldChange::text("rut", Some(self.rut.to_string())),
            FieldChange::boolean("activo", true),
            FieldChange::float("x", Some(self.x)),
            FieldChange::float("y", Some(self.y)),
        ]
    }
}

struct UsuarioDemo {
    email: &'static str,
    password: &'static str,
    nombre: &'static str,
    apellido: &'static str,
    rol: &'static str,
    activo: bool,
}

const USUARIOS: [UsuarioDemo; 7] = [
    UsuarioDemo {
        email: "admin@mapaclientes.com",
        password: "admin123",
        nombre: "Administrador",
        apellido: "Principal",
        rol: "super_admin",
        activo: true,
    },
    UsuarioDemo {
        email: "gerente@mapaclientes.com",
        password: "gerente123",
        nombre: "María",
        apellido: "González",
        rol: "admin",
        activo: true,
    },
    UsuarioDemo {
        email: "usuario1@mapaclientes.com",
        password: "usuario123",
        nombre: "Juan",
        apellido: "Pérez",
        rol: "user",
        activo: true,
    },
    UsuarioDemo {
        email: "usuario2@mapaclientes.com",
        password: "usuario123",
        nombre: "Ana",
        apellido: "Martínez",
        rol: "user",
        activo: true,
    },
    UsuarioDemo {
        email: "operador@mapaclientes.com",
        password: "operador123",
        nombre: "Carlos",
        apellido: "Rodríguez",
        rol: "user",
        activo: true,
    },
    UsuarioDemo {
        email: "supervisor@mapaclientes.com",
        password: "supervisor123",
        nombre: "Laura",
        apellido: "Fernández",
        rol: "admin",
        activo: true,
    },
    UsuarioDemo {
        email: "inactivo@mapaclientes.com",
        password: "inactivo123",
        nombre: "Usuario",
        apellido: "Inactivo",
        rol: "user",
        activo: false,
    },
];

impl UsuarioDemo {
    fn changes(&self, hashed: String) -> Vec<FieldChange> {
        vec![
            FieldChange::text("email", Some(self.email.to_string())),
            FieldChange::text("password", Some(hashed)),
            FieldChange::text("nombre", Some(self.nombre.to_string())),
            FieldChange::text("apellido", Some(self.apellido.to_string())),
            FieldChange::text("rol", Some(self.rol.to_string())),
            FieldChange::boolean("activo", self.activo),
        ]
    }
}

fn descripcion(value: &str) -> [FieldChange; 1] {
    [FieldChange::text("descripcion", Some(value.to_string()))]
}

/// Carga los datos de demostración en las tablas que estén vacías.
/// `password_cost` es el costo bcrypt de las contraseñas de los usuarios.
pub async fn seed_demo_data(stores: &Stores, password_cost: u32) -> AppResult<()> {
    info!("🌱 Cargando datos de demostración...");

    let mut dias: Vec<EntityId> = Vec::new();
    if stores.dias_entrega.count().await? == 0 {
        for dia in DIAS {
            let created: DiaEntrega = stores.dias_entrega.create(&descripcion(dia)).await?;
            dias.push(created.id);
        }
        info!("✅ {} días de entrega creados", dias.len());
    }

    let mut camiones: Vec<EntityId> = Vec::new();
    if stores.camiones.count().await? == 0 {
        for camion in CAMIONES {
            let created: Camion = stores.camiones.create(&descripcion(camion)).await?;
            camiones.push(created.id);
        }
        info!("✅ {} camiones creados", camiones.len());
    }

    if stores.clientes.count().await? == 0 {
        for cliente in &CLIENTES {
            let created: Cliente = stores.clientes.create(&cliente.changes()).await?;
            info!("✅ Cliente creado: {}", created.nombre);
        }
    }

    if stores.usuarios.count().await? == 0 {
        for usuario in &USUARIOS {
            let hashed = hash_password(usuario.password.to_string(), password_cost).await?;
            let _: Usuario = stores.usuarios.create(&usuario.changes(hashed)).await?;
        }
        info!("✅ {} usuarios creados", USUARIOS.len());
    }

    // Relaciones sólo cuando ambos lados se crearon ahora
    if dias.len() == DIAS.len() && camiones.len() == CAMIONES.len() {
        for (camion, dias_camion) in RELACIONES {
            let ids: Vec<EntityId> = dias_camion.iter().map(|&i| dias[i]).collect();
            stores
                .asignaciones
                .replace(AssignmentSide::Camion, camiones[camion], &ids)
                .await?;
        }
        info!("🔗 Relaciones camiones-días creadas");
    }

    info!("🎉 Datos de demostración listos");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repositories::MemoryStore;

    #[tokio::test]
    async fn test_seed_en_memoria() {
        let stores = Stores::memory(Arc::new(MemoryStore::new()));
        seed_demo_data(&stores, crate::utils::password::MIN_COST).await.unwrap();

        assert_eq!(stores.dias_entrega.count().await.unwrap(), 5);
        assert_eq!(stores.camiones.count().await.unwrap(), 5);
        assert_eq!(stores.clientes.count().await.unwrap(), 2);

        let con_dias = stores
            .asignaciones
            .list_with_counterparts(AssignmentSide::Camion)
            .await
            .unwrap();
        let daniel = con_dias
            .iter()
            .find(|camion| camion.descripcion == "Daniel Torres")
            .unwrap();
        let nombres: Vec<&str> = daniel.asignados.iter().map(|d| d.descripcion.as_str()).collect();
        assert_eq!(nombres, vec!["Lunes", "Martes"]);

        let stats = stores.usuario_queries.stats().await.unwrap();
        assert_eq!(stats.total, 7);
        assert_eq!(stats.inactivos, 1);
        assert_eq!(stats.por_rol.get("super_admin"), Some(&1));
    }

    #[tokio::test]
    async fn test_seed_no_duplica() {
        let stores = Stores::memory(Arc::new(MemoryStore::new()));
        seed_demo_data(&stores, crate::utils::password::MIN_COST).await.unwrap();
        seed_demo_data(&stores, crate::utils::password::MIN_COST).await.unwrap();

        assert_eq!(stores.camiones.count().await.unwrap(), 5);
        assert_eq!(stores.clientes.count().await.unwrap(), 2);
        assert_eq!(stores.usuarios.count().await.unwrap(), 7);
    }
}
