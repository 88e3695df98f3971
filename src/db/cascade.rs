// src/db/cascade.rs

//! Remoção em cascata explícita.
//!
//! As FKs do schema não têm `ON DELETE CASCADE`: quem apaga um dono chama uma
//! destas funções dentro da transação e os dependentes são removidos de baixo
//! para cima (itens → pedidos → workflows → funcionários). Se algum dependente
//! for esquecido, a FK rejeita o DELETE e a transação inteira volta atrás.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::common::error::AppError;

/// Quais funcionários uma remoção atinge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeScope {
    Employee(Uuid),
    Department(Uuid),
    Account(Uuid),
}

impl EmployeeScope {
    fn column(&self) -> &'static str {
        match self {
            EmployeeScope::Employee(_) => "id",
            EmployeeScope::Department(_) => "department_id",
            EmployeeScope::Account(_) => "account_id",
        }
    }

    fn id(&self) -> Uuid {
        match *self {
            EmployeeScope::Employee(id) | EmployeeScope::Department(id) | EmployeeScope::Account(id) => id,
        }
    }

    /// As instruções da cascata, na ordem em que precisam rodar.
    fn statements(&self) -> [String; 4] {
        let column = self.column();
        [
            format!(
                "DELETE FROM request_items WHERE request_id IN (
                    SELECT r.id FROM requests r
                    INNER JOIN employees e ON e.id = r.employee_id
                    WHERE e.{column} = $1)"
            ),
            format!(
                "DELETE FROM requests WHERE employee_id IN (
                    SELECT id FROM employees WHERE {column} = $1)"
            ),
            format!(
                "DELETE FROM workflows WHERE employee_id IN (
                    SELECT id FROM employees WHERE {column} = $1)"
            ),
            format!("DELETE FROM employees WHERE {column} = $1"),
        ]
    }
}

/// Remove os funcionários do escopo e tudo que pertence a eles.
/// Devolve quantos funcionários foram removidos.
pub async fn purge_employees(conn: &mut PgConnection, scope: EmployeeScope) -> Result<u64, AppError> {
    let mut removed = 0;
    for sql in scope.statements() {
        removed = sqlx::query(&sql)
            .bind(scope.id())
            .execute(&mut *conn)
            .await?
            .rows_affected();
    }
    // O último DELETE é o dos funcionários
    Ok(removed)
}

pub async fn delete_request(conn: &mut PgConnection, id: Uuid) -> Result<bool, AppError> {
    sqlx::query("DELETE FROM request_items WHERE request_id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    let result = sqlx::query("DELETE FROM requests WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_employee(conn: &mut PgConnection, id: Uuid) -> Result<bool, AppError> {
    let removed = purge_employees(conn, EmployeeScope::Employee(id)).await?;
    Ok(removed > 0)
}

pub async fn delete_department(conn: &mut PgConnection, id: Uuid) -> Result<bool, AppError> {
    purge_employees(&mut *conn, EmployeeScope::Department(id)).await?;

    let result = sqlx::query("DELETE FROM departments WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_account(conn: &mut PgConnection, id: Uuid) -> Result<bool, AppError> {
    sqlx::query("DELETE FROM refresh_tokens WHERE account_id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    purge_employees(&mut *conn, EmployeeScope::Account(id)).await?;

    let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_delete_leaves_first() {
        let statements = EmployeeScope::Department(Uuid::new_v4()).statements();

        assert!(statements[0].starts_with("DELETE FROM request_items"));
        assert!(statements[1].starts_with("DELETE FROM requests"));
        assert!(statements[2].starts_with("DELETE FROM workflows"));
        assert!(statements[3].starts_with("DELETE FROM employees"));
    }

    #[test]
    fn scope_selects_the_matching_column() {
        let id = Uuid::new_v4();

        assert!(EmployeeScope::Employee(id).statements()[3].ends_with("WHERE id = $1"));
        assert!(EmployeeScope::Department(id).statements()[3].ends_with("WHERE department_id = $1"));
        assert!(EmployeeScope::Account(id).statements()[3].ends_with("WHERE account_id = $1"));
        assert_eq!(EmployeeScope::Account(id).id(), id);
    }
}
